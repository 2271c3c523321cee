//! Aurora CLI - inspect and reset shopper state, browse the catalog.
//!
//! # Usage
//!
//! ```bash
//! # Show what the storefront has persisted
//! aurora-cli cart show
//! aurora-cli wishlist show
//! aurora-cli account show
//!
//! # Reset state (the storefront should be stopped first)
//! aurora-cli cart clear
//! aurora-cli account logout
//!
//! # Query the product catalog
//! aurora-cli catalog products --limit 5
//! aurora-cli catalog product 3
//!
//! # Point at another data directory
//! aurora-cli --data-dir /tmp/aurora cart show
//! ```
//!
//! # Commands
//!
//! - `cart show|clear` - Persisted cart
//! - `wishlist show|clear` - Persisted wishlist
//! - `account show|logout` - Persisted session
//! - `catalog products|categories|product` - Live catalog queries

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "aurora-cli")]
#[command(author, version, about = "Aurora CLI tools")]
struct Cli {
    /// Directory holding the persisted state (defaults to `STOREFRONT_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or clear the cart
    Cart {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Inspect or clear the wishlist
    Wishlist {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Inspect or end the saved session
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Query the product catalog
    Catalog {
        #[command(subcommand)]
        query: CatalogQuery,
    },
}

#[derive(Subcommand)]
enum StateAction {
    /// Print the current contents
    Show,
    /// Remove everything
    Clear,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Print the signed-in user
    Show,
    /// Sign out
    Logout,
}

#[derive(Subcommand)]
enum CatalogQuery {
    /// List products
    Products {
        /// Only the first N products
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List categories
    Categories,
    /// Show one product
    Product {
        /// Product id
        id: i32,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let format = if cli.json {
        commands::Format::Json
    } else {
        commands::Format::Text
    };

    match cli.command {
        Commands::Cart { action } => {
            let dir = commands::resolve_data_dir(cli.data_dir)?;
            match action {
                StateAction::Show => commands::state::show_cart(&dir, format)?,
                StateAction::Clear => commands::state::clear_cart(&dir),
            }
        }
        Commands::Wishlist { action } => {
            let dir = commands::resolve_data_dir(cli.data_dir)?;
            match action {
                StateAction::Show => commands::state::show_wishlist(&dir, format)?,
                StateAction::Clear => commands::state::clear_wishlist(&dir),
            }
        }
        Commands::Account { action } => {
            let dir = commands::resolve_data_dir(cli.data_dir)?;
            match action {
                AccountAction::Show => commands::state::show_account(&dir, format)?,
                AccountAction::Logout => commands::state::logout(&dir),
            }
        }
        Commands::Catalog { query } => match query {
            CatalogQuery::Products { limit } => commands::catalog::products(limit, format).await?,
            CatalogQuery::Categories => commands::catalog::categories(format).await?,
            CatalogQuery::Product { id } => commands::catalog::product(id, format).await?,
        },
    }
    Ok(())
}
