use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use eo_data::config::Config;
use eo_web::state::AppState;

#[derive(Parser)]
#[command(name = "eo-web", about = "Dashboard for cached executive orders")]
struct Cli {
    /// Path to config file (default: ~/.config/eo-tracker/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref())?;
    info!(cache_dir = %config.cache_dir.display(), model = %config.llm.model, "loaded config");
    if config.llm.api_key.is_none() {
        warn!("no language model API key configured; summaries will fail (set GROQ_API_KEY)");
    }

    let state = AppState::from_config(&config)?;
    let app = eo_web::build_router(state);

    let port = cli.port.unwrap_or(config.http_port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("eo-web listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received ctrl-c, shutting down");
        })
        .await?;

    Ok(())
}
