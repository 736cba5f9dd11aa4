mod config;
mod http;
mod logging;
mod shutdown;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use product_search::ProductSearchModule;

use crate::config::AppConfig;

/// Catalog proxy server - signs product searches for the upstream catalog API
#[derive(Parser)]
#[command(name = "catalog-proxy-server")]
#[command(about = "Catalog proxy server - signs product searches for the upstream catalog API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.apply_cli_overrides(cli.port, cli.verbose);

    if cli.print_config {
        println!("{}", config.to_pretty_json()?);
        return Ok(());
    }

    logging::init(&config.logging);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("checking configuration");
    config
        .product_search
        .validate()
        .context("invalid product_search configuration")?;
    println!("Configuration is valid");
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

async fn run_server(config: &AppConfig) -> Result<()> {
    let module = ProductSearchModule::from_config(&config.product_search)
        .context("failed to initialize product search")?;
    module.preload_key().await;

    let router = http::build_router(&module, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "catalog proxy listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "shutdown signal listener failed");
            }
        })
        .await
        .context("HTTP server terminated abnormally")?;

    tracing::info!("catalog proxy stopped");
    Ok(())
}
