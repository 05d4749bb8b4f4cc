//! mybest-scraper - product comparison scraper and JSON API for my-best.com
//!
//! Runs one scrape from the command line, or serves the same data over HTTP.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mybest_scraper::commands::{CategoriesCommand, DetailCommand, ListCommand, ListScope};
use mybest_scraper::config::{Config, OutputFormat};
use mybest_scraper::server;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mybest-scraper",
    version,
    about = "Product comparison scraper for my-best.com",
    long_about = "Scrapes my-best.com article listings, categories and ranked product comparisons, \
                  with affiliate-tagged marketplace links, as JSON or a table, or serves them over HTTP."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "MYBEST_PROXY")]
    proxy: Option<String>,

    /// Output format [json, table]
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Site to scrape
    #[arg(long, global = true)]
    site_url: Option<String>,

    /// Public API base used in generated links
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List articles
    #[command(alias = "ls")]
    List {
        /// Listing page
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Show an article's ranked product comparison
    #[command(alias = "d")]
    Detail {
        /// Article id (last path segment of the article URL)
        id: String,
    },

    /// Discover categories
    Categories,

    /// List articles in a category
    Category {
        /// Numeric category slug
        slug: String,

        /// Listing page
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Serve the JSON API
    Serve {
        /// Address to listen on (host:port)
        #[arg(short, long, env = "MYBEST_BIND")]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(site_url) = cli.site_url {
        config.site_url = site_url;
    }
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }

    match cli.command {
        Commands::List { page } => {
            let output = ListCommand::new(config).execute(&ListScope::Global, page).await?;
            println!("{}", output);
        }

        Commands::Detail { id } => {
            let output = DetailCommand::new(config).execute(&id).await?;
            println!("{}", output);
        }

        Commands::Categories => {
            let output = CategoriesCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Category { slug, page } => {
            let output = ListCommand::new(config).execute(&ListScope::Category(slug), page).await?;
            println!("{}", output);
        }

        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            server::serve(config).await?;
        }
    }

    Ok(())
}
