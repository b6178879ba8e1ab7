//! Account forms and profile helpers

use crate::error::ValidationError;
use crate::types::{default_avatar, UserRecord};
use base64::Engine;

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 4;

/// Raw signup input
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    /// Data URI of an uploaded picture
    pub avatar: Option<String>,
}

/// Check a signup form and build the record it describes
///
/// Text fields are trimmed; passwords are taken verbatim. Whether the
/// account already exists is checked by the caller.
pub fn validate_signup(form: SignupForm) -> Result<UserRecord, ValidationError> {
    let firstname = form.firstname.trim();
    let lastname = form.lastname.trim();
    let email = form.email.trim();
    let phone = form.phone.trim();

    if firstname.is_empty()
        || lastname.is_empty()
        || email.is_empty()
        || form.password.is_empty()
        || form.confirm_password.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    validate_password(&form.password)?;

    Ok(UserRecord {
        username: email.to_string(),
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        password: form.password,
        avatar: form.avatar.unwrap_or_else(default_avatar),
        favorites: Vec::new(),
        reading_list: Vec::new(),
        inventory: Vec::new(),
    })
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Encode a picture file as a base64 data URI
pub fn avatar_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Guess an image MIME type from a file extension
pub fn image_mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
