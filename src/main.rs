use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use taskboard::config::Overrides;
use taskboard::{ConfigLoader, db, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Todo and category tracking HTTP backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Database URL (file path or `libsql://...`)
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,

    /// Deployment environment: development or production
    #[arg(long = "env", value_name = "ENV")]
    environment: Option<String>,
}

#[tokio::main]
async fn main() -> taskboard::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskboard=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::default().load(
        cli.config.as_deref(),
        Overrides {
            host: cli.host.as_deref(),
            port: cli.port,
            database_url: cli.database_url.as_deref(),
            environment: cli.environment.as_deref(),
        },
    )?;

    info!(
        environment = %config.environment,
        database = %config.database.url,
        "starting taskboard"
    );

    let database = db::connect(&config.database.url).await?;
    db::migrate(&database).await?;

    let router = taskboard::app(&config);
    let server = server::start(config, Some(Arc::new(database)), router.into_handle()).await?;

    tokio::signal::ctrl_c().await?;
    server.shutdown().await
}
