//! Game top-up LINE bot web server.
//!
//! This binary:
//! - Loads configuration and refuses to start without channel credentials
//! - Receives LINE webhooks and dispatches events to the bot handlers
//! - Serves the health probe, landing page and payment pages

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, level_filters::LevelFilter};

use topup_bot::{default_registry, logging, router, AppState, Config, Dispatcher, LineClient};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init(LevelFilter::INFO, false);
            error!(error = %e, "config_invalid");
            return Err(e).context("Configuration validation failed");
        }
    };

    logging::init(config.log_level, config.debug_mode);

    info!("web_server_starting");
    info!(
        port = config.port,
        environment = %config.environment,
        debug_mode = config.debug_mode,
        database_url_set = !config.database_url.is_empty(),
        line_api_base_url = %config.line_api_base_url,
        line_bot_connected = config.line_credentials_present(),
        "config_loaded"
    );

    // Outbound reply client
    let client = LineClient::from_config(&config).context("Failed to create HTTP client")?;

    let registry = default_registry();
    info!(handler_count = registry.len(), "handlers_registered");

    let dispatcher = Dispatcher::new(registry, Arc::new(client));
    let port = config.port;
    let app = router(AppState::new(config, dispatcher));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
