//! Account commands: signup, signin, profile changes

use super::{report, Context};
use anyhow::{Context as _, Result};
use readerslib_core::account::{avatar_data_uri, image_mime_for_extension, SignupForm};
use std::path::{Path, PathBuf};

/// Signup input as given on the command line
pub struct SignupArgs {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub avatar: Option<PathBuf>,
}

/// Read an image file into a data URI
fn read_avatar(path: &Path) -> Result<String> {
    let mime = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(image_mime_for_extension)
        .with_context(|| format!("Unsupported picture format: {}", path.display()))?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read picture: {}", path.display()))?;
    Ok(avatar_data_uri(mime, &bytes))
}

/// Create a new account
pub fn signup(ctx: &Context, args: SignupArgs) -> Result<()> {
    // A picture that can't be read doesn't block the signup
    let avatar = args.avatar.as_deref().and_then(|path| match read_avatar(path) {
        Ok(uri) => Some(uri),
        Err(e) => {
            eprintln!("Warning: Failed to process profile picture: {:#}", e);
            None
        }
    });

    let notice = ctx.library.signup(SignupForm {
        firstname: args.firstname,
        lastname: args.lastname,
        email: args.email,
        phone: args.phone,
        password: args.password,
        confirm_password: args.confirm_password,
        avatar,
    })?;
    report(&notice);
    Ok(())
}

pub fn signin(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let session = ctx.library.signin(email, password)?;
    println!("Signed in as {}", session.user.display_name());
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    let notice = match ctx.library.restore_session() {
        Some(session) => ctx.library.logout(session),
        None => readerslib_core::Notice::info("Not signed in"),
    };
    report(&notice);
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    match ctx.library.restore_session() {
        Some(session) => {
            let user = &session.user;
            println!("Name:      {}", user.display_name());
            println!("Username:  {}", user.username);
            if !user.phone.is_empty() {
                println!("Phone:     {}", user.phone);
            }
            println!("Favorites: {}", user.favorites.len());
            println!("Reading:   {}", user.reading_list.len());
            println!("Borrowed:  {}", user.inventory.iter().filter(|i| i.is_borrowed()).count());
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

pub fn password(ctx: &Context, new_password: &str) -> Result<()> {
    let mut session = ctx.require_session()?;
    let notice = ctx.library.change_password(&mut session, new_password)?;
    report(&notice);
    Ok(())
}

pub fn avatar(ctx: &Context, path: &Path) -> Result<()> {
    let mut session = ctx.require_session()?;
    let uri = read_avatar(path).context("Failed to update profile picture")?;
    let notice = ctx.library.change_avatar(&mut session, uri);
    report(&notice);
    Ok(())
}

pub fn delete_account(ctx: &Context) -> Result<()> {
    let session = ctx.require_session()?;
    let notice = ctx.library.delete_account(&session)?;
    report(&notice);
    Ok(())
}
