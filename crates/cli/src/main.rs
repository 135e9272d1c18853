//! Tokoku CLI - catalog browsing and sample dashboard tools.
//!
//! # Usage
//!
//! ```bash
//! # List the first page of the catalog, cheapest first
//! tokoku catalog list --sort price-asc
//!
//! # Search within a category
//! tokoku catalog list --search backpack --category "men's clothing"
//!
//! # Show categories and the price range
//! tokoku catalog categories
//!
//! # Print the sample dashboard
//! tokoku dashboard
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tokoku")]
#[command(author, version, about = "Tokoku CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the remote product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Print the sample dashboard stats, recent orders and top products
    Dashboard,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Filter, sort and paginate the catalog
    List {
        /// Text matched against title, description and category
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category name, or `all`
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Sort order (`price-asc`, `price-desc`, `rating`, `name`)
        #[arg(long, default_value = "")]
        sort: String,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// List categories and the catalog price range
    Categories,
}

#[tokio::main]
async fn main() {
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
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                search,
                category,
                sort,
                page,
            } => commands::catalog::list(&search, &category, &sort, page).await?,
            CatalogAction::Categories => commands::catalog::categories().await?,
        },
        Commands::Dashboard => commands::dashboard::show(),
    }
    Ok(())
}
