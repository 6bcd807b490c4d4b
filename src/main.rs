//! wp-meta-rs binary entry point
//!
//! Loads configuration, initializes logging and serves either MCP over
//! stdio or the HTTP API.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use wp_meta_rs::config::{AppConfig, ConfigLoader, Transport};
use wp_meta_rs::http_server::{self, AppState};
use wp_meta_rs::logging::{init_logging, LogConfig};
use wp_meta_rs::mcp::{McpServer, MetaToolHandler};
use wp_meta_rs::MetaGenerator;

#[derive(Debug, Parser)]
#[command(name = "wp-meta-rs", version, about = "SEO meta description generator for WordPress")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "WPMETA_CONFIG")]
    config: Option<PathBuf>,

    /// Transport to serve
    #[arg(short, long, value_enum)]
    transport: Option<Transport>,

    /// HTTP bind address, e.g. 127.0.0.1:3000
    #[arg(long)]
    bind: Option<String>,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        print!("{}", AppConfig::sample_toml()?);
        return Ok(());
    }

    let mut config = ConfigLoader::new()
        .with_file(cli.config.as_deref())
        .load_from_env()
        .build()?;

    if let Some(transport) = cli.transport {
        config.server.transport = transport;
    }
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&LogConfig::from_logging_config(&config.logging))?;

    info!(
        "Starting {} v{} ({:?} transport)",
        config.server.name, config.server.version, config.server.transport
    );

    let generator = Arc::new(MetaGenerator::new(config.generator.to_options()));
    let handler = Arc::new(
        MetaToolHandler::new(generator)
            .with_defaults(
                config.generator.default_tone,
                config.generator.default_max_length,
            )
            .with_server_info(config.server.name.clone(), config.server.version.clone()),
    );

    match config.server.transport {
        Transport::Stdio => {
            McpServer::new(handler)
                .run_stdio()
                .await
                .context("MCP stdio server failed")?;
        }
        Transport::Http => {
            let api_key = match config.server.api_key.clone() {
                Some(key) => key,
                None => {
                    let key = http_server::generate_api_key();
                    warn!("No API key configured, generated one for this run");
                    info!("API key for the WordPress plugin: {}", key);
                    key
                }
            };
            let addr = config.bind_socket_addr()?;
            http_server::serve(AppState::new(handler, api_key), addr)
                .await
                .context("HTTP server failed")?;
        }
    }

    Ok(())
}
