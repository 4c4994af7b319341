use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use eo_data::config::Config;
use eo_data::{list_orders_in, sort_rows, SortKey, SortOrder};
use eo_fetch::{display_executive_orders, RegistryClient};

#[derive(Parser)]
#[command(name = "eo-fetch")]
#[command(about = "Fetch executive orders from the Federal Register into the local cache")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/eo-tracker/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all orders signed on or after a date and save them to the cache
    Fetch {
        /// Earliest signing date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Cache directory override
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// List cached orders
    List {
        /// Cache directory override
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Sort column: signing_date or publication_date
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort descending
        #[arg(long, default_value = "false")]
        desc: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref())?;

    match cli.command {
        Commands::Fetch { since, cache_dir } => {
            let cache_dir = cache_dir.unwrap_or(config.cache_dir.clone());
            let start_date = since.unwrap_or(config.start_date.clone());
            let registry = RegistryClient::new(&config.registry_url, config.http_timeout())?;
            tracing::info!(
                registry = %registry.base_url(),
                cache_dir = %cache_dir.display(),
                "initialized registry client"
            );

            let orders = registry.fetch_all_executive_orders(&start_date).await;
            let mut stdout = std::io::stdout().lock();
            display_executive_orders(&registry, &orders, &cache_dir, &mut stdout).await
        }

        Commands::List {
            cache_dir,
            sort_by,
            desc,
        } => {
            let cache_dir = cache_dir.unwrap_or(config.cache_dir);
            let mut rows = list_orders_in(&cache_dir)?;
            if let Some(key) = sort_by.as_deref().and_then(SortKey::parse) {
                let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
                sort_rows(&mut rows, key, order);
            }

            if rows.is_empty() {
                println!("No cached executive orders.");
                return Ok(());
            }

            println!(
                "{:<12} {:<14} {:<12} {:<12} {}",
                "ID", "DOCUMENT", "SIGNED", "PUBLISHED", "TITLE"
            );
            println!("{}", "-".repeat(80));
            for row in rows {
                println!(
                    "{:<12} {:<14} {:<12} {:<12} {}",
                    row.id, row.doc_number, row.signing_date, row.publication_date, row.title
                );
            }
            Ok(())
        }
    }
}
