//! Pathik - grid probe daemon
//!
//! Serves one shared probe session over TCP (length-prefixed JSON frames).
//! Every connected client drives the same probe; requests are serialized.

use pathik::config::AppConfig;
use pathik::error::{Error, Result};
use pathik::session::ProbeSession;
use pathik::streaming::TcpServer;
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Config file picked up from the working directory when no path is given
const DEFAULT_CONFIG_PATH: &str = "pathik.toml";

/// Parse config path from command line arguments.
///
/// Supports:
/// - `pathik <path>` (positional)
/// - `pathik --config <path>` (flag-based)
/// - `pathik -c <path>` (short flag)
fn parse_config_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return Some(args[1].clone());
    }

    Path::new(DEFAULT_CONFIG_PATH)
        .exists()
        .then(|| DEFAULT_CONFIG_PATH.to_string())
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config = match &config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("Pathik v{} starting...", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => log::info!("Using config: {}", path),
        None => log::info!("Using default configuration"),
    }

    let session = Arc::new(ProbeSession::new());
    if let Some(scenario) = &config.scenario {
        log::info!("Placing startup probe from [scenario]");
        session.initialize(scenario)?;
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let server = TcpServer::bind(&config.network, session, running)?;
    log::info!("Pathik running. Press Ctrl-C to stop.");
    server.run()?;

    log::info!("Pathik stopped");
    Ok(())
}
