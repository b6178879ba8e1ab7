//! ReadersLib CLI - Command-line front end for the local library browser

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use readerslib_core::catalog::{LibraryFilter, SearchField};
use readerslib_core::{BookId, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "readerslib")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding accounts, the session and the catalog cache
    /// [default: $READERSLIB_DATA_DIR or ./readerslib_data]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Catalog endpoint [default: $READERSLIB_CATALOG_URL or https://gutendex.com/books]
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Signup {
        #[arg(long)]
        firstname: String,

        #[arg(long)]
        lastname: String,

        /// Email address, also used as the username
        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm_password: String,

        /// Profile picture file
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// Sign in and remember the session
    Signin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Browse the catalog
    Library {
        /// Search query
        #[arg(short, long)]
        search: Option<String>,

        /// Field the query is matched against (all, title, author, subject)
        #[arg(long, default_value = "all")]
        by: SearchField,

        /// Show only some books (all, available, borrowed, favorites)
        #[arg(short, long, default_value = "all")]
        filter: LibraryFilter,

        /// Fetch a fresh listing instead of using the cache
        #[arg(long)]
        refresh: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display details of a catalog book
    Show {
        id: BookId,
    },

    /// Add a book to favorites, or remove it
    Favorite {
        id: BookId,
    },

    /// Borrow a book, or return it if already borrowed
    Borrow {
        id: BookId,
    },

    /// Return a borrowed book
    Return {
        id: BookId,
    },

    /// List favorite books
    Favorites {
        /// Remove a book from favorites
        #[arg(long)]
        remove: Option<BookId>,
    },

    /// List the reading list
    ReadingList {
        /// Remove a book from the reading list
        #[arg(long)]
        remove: Option<BookId>,
    },

    /// List borrowed and returned books
    Shelf,

    /// Change the password
    Password {
        new_password: String,
    },

    /// Change the profile picture
    Avatar {
        /// Image file
        path: PathBuf,
    },

    /// Delete the signed-in account
    DeleteAccount,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "readerslib_cli=debug,readerslib_core=debug"
    } else {
        "readerslib_cli=info,readerslib_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    if let Some(catalog_url) = cli.catalog_url {
        config = config.with_catalog_url(catalog_url);
    }
    let ctx = commands::Context::new(config);

    match cli.command {
        Commands::Signup {
            firstname,
            lastname,
            email,
            phone,
            password,
            confirm_password,
            avatar,
        } => commands::signup(
            &ctx,
            commands::SignupArgs {
                firstname,
                lastname,
                email,
                phone,
                password,
                confirm_password,
                avatar,
            },
        ),

        Commands::Signin { email, password } => commands::signin(&ctx, &email, &password),

        Commands::Logout => commands::logout(&ctx),

        Commands::Whoami => commands::whoami(&ctx),

        Commands::Library {
            search,
            by,
            filter,
            refresh,
            json,
        } => {
            commands::library(
                &ctx,
                commands::LibraryArgs {
                    search,
                    by,
                    filter,
                    refresh,
                    json,
                },
            )
            .await
        }

        Commands::Show { id } => commands::show(&ctx, id).await,

        Commands::Favorite { id } => commands::favorite(&ctx, id).await,

        Commands::Borrow { id } => commands::borrow(&ctx, id).await,

        Commands::Return { id } => commands::return_book(&ctx, id),

        Commands::Favorites { remove } => commands::favorites(&ctx, remove),

        Commands::ReadingList { remove } => commands::reading_list(&ctx, remove),

        Commands::Shelf => commands::shelf(&ctx),

        Commands::Password { new_password } => commands::password(&ctx, &new_password),

        Commands::Avatar { path } => commands::avatar(&ctx, &path),

        Commands::DeleteAccount => commands::delete_account(&ctx),
    }
}
