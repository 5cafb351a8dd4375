//! Buycom CLI - inspect and reset persisted storefront state.
//!
//! # Usage
//!
//! ```bash
//! # Show favorites and cart
//! buycom-cli state show
//!
//! # Empty the cart only
//! buycom-cli state clear --cart
//!
//! # List locally stored listings, newest first
//! buycom-cli listings list
//!
//! # Delete one listing
//! buycom-cli listings delete 1718000000000123
//!
//! # Throw away the saved "add product" form
//! buycom-cli --data-dir /var/lib/buycom draft discard
//! ```
//!
//! # Commands
//!
//! - `state show` / `state clear` - Favorites and cart
//! - `listings list` / `listings delete` / `listings clear` - "My ads" store
//! - `draft discard` - Saved listing form
//!
//! The CLI works on the data directory directly and never calls the catalog.
//! Stop the storefront first: it only reads the directory at startup.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use buycom_core::ListingId;
use buycom_storefront::config::DEFAULT_DATA_DIR;
use buycom_storefront::storage::{FileStorage, KeyValueStorage};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "buycom-cli")]
#[command(author, version, about = "Buycom CLI tools")]
struct Cli {
    /// Directory holding persisted storefront state
    #[arg(long, global = true, env = "BUYCOM_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Favorites and cart
    State {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Locally stored "my ads" listings
    Listings {
        #[command(subcommand)]
        action: ListingsAction,
    },
    /// Saved "add product" form
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand)]
enum StateAction {
    /// Print favorites and cart with subtotal
    Show,
    /// Clear favorites and/or cart (both when no flag is given)
    Clear {
        /// Clear the cart
        #[arg(long)]
        cart: bool,

        /// Clear favorites
        #[arg(long)]
        favorites: bool,
    },
}

#[derive(Subcommand)]
enum ListingsAction {
    /// List listings, newest first
    List,
    /// Delete one listing
    Delete {
        /// Listing id
        id: ListingId,
    },
    /// Delete every listing
    Clear,
}

#[derive(Subcommand)]
enum DraftAction {
    /// Discard the saved form
    Discard,
}

fn main() -> ExitCode {
    // Load .env before clap reads BUYCOM_DATA_DIR
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(&cli.data_dir)?);

    match cli.command {
        Commands::State { action } => match action {
            StateAction::Show => commands::state::show(storage),
            StateAction::Clear { cart, favorites } => {
                // No flag means both
                let both = !cart && !favorites;
                commands::state::clear(storage, cart || both, favorites || both)?;
            }
        },
        Commands::Listings { action } => match action {
            ListingsAction::List => commands::listings::list(storage)?,
            ListingsAction::Delete { id } => commands::listings::delete(storage, id)?,
            ListingsAction::Clear => commands::listings::clear(storage)?,
        },
        Commands::Draft { action } => match action {
            DraftAction::Discard => commands::draft::discard(storage)?,
        },
    }
    Ok(())
}
