//! Supermarket API server entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use supermarkt_api::api::{create_router, metrics_router, AppState};
use supermarkt_api::config::Config;
use supermarkt_api::connector::AhConnector;
use supermarkt_api::error::AppError;
use supermarkt_api::metrics;
use supermarkt_api::utils::shutdown_signal;

/// HTTP proxy for Albert Heijn product search and categories.
#[derive(Parser, Debug)]
#[command(name = "supermarkt-api")]
#[command(about = "Proxy Albert Heijn product search and categories over HTTP")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// HTTP server host (overrides HOST).
    #[arg(long, env = "HOST")]
    host: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,

        /// HTTP server host.
        #[arg(long)]
        host: Option<String>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let directive = Config::load()
        .unwrap_or_default()
        .log_directive(args.verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Serve { port, host }) => {
            cmd_serve(port.or(args.port), host.or(args.host)).await
        }
        None => cmd_serve(args.port, args.host).await,
    }
}

/// Load and validate configuration, applying CLI overrides.
fn load_config(port: Option<u16>, host: Option<String>) -> Result<Config, AppError> {
    let mut config = Config::load()?;

    if let Some(port) = port {
        config.port = port;
    }
    if let Some(host) = host {
        config.host = host;
    }

    config.validate().map_err(AppError::InvalidConfig)?;
    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SUPERMARKT API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match load_config(None, None) {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration check failed"));
        }
    };

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind Address: {}", config.bind_addr());
    println!("  AH Base URL: {}", config.ah_base_url);
    println!("  AH User Agent: {}", config.ah_user_agent);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(port: Option<u16>, host: Option<String>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config(port, host).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let metrics_handle = metrics::install_recorder()?;

    let connector = AhConnector::new(&config)?;
    info!(base_url = %connector.base_url(), "Using Albert Heijn connector");

    let router = create_router(AppState::new(connector)).merge(metrics_router(metrics_handle));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await.map_err(AppError::from)?;
    info!("Starting server on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
