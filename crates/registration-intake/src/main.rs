//! Registration Intake - Entry point.

use anyhow::Context;
use registration_intake::{
    api::{create_router_with_cors, AppState},
    config::{Config, LogConfig},
    store::Store,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log);

    info!("Starting Registration Intake");

    // Storage connects on first use
    let store = if config.database.persist {
        if config.database.uri.is_none() {
            warn!("MONGODB_URI not set; registrations will fail until it is configured");
        }
        Store::new(config.database)
    } else {
        info!("Persistence disabled, using in-memory storage");
        Store::memory()
    };

    let state = AppState::new(store);
    let app = create_router_with_cors(state, &config.cors);

    // Bind to address
    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address: {}", config.server.listen_addr))?,
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on {}", addr);

    // Run server
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
