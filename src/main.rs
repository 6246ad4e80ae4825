use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use circuit_game_server::{
    config::Config,
    engine::GameEngine,
    generator::GeneratorClient,
    server::{self, AppState},
    store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Circuit game server starting..."
    );

    // Initialize generator client
    let generator = match GeneratorClient::new(&config.generator, config.request.clone()) {
        Ok(c) => {
            info!(base_url = %config.generator.base_url, "Generator client initialized");
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize generator client");
            return Err(e.into());
        }
    };

    // Session storage is in-memory; sessions are TTL-swept below.
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());

    let engine = GameEngine::new(generator, store, config.game.clone());
    let state = Arc::new(AppState { engine });

    // Periodic sweep of expired sessions.
    let sweeper = Arc::clone(&state);
    let sweep_interval = std::time::Duration::from_secs(config.game.sweep_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        // The first tick completes immediately; skip it.
        interval.tick().await;
        loop {
            interval.tick().await;
            match sweeper.engine.sweep_expired().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Swept expired game sessions"),
                Err(e) => error!(error = %e, "Session sweep failed"),
            }
        }
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(addr = %addr, "Server ready, waiting for requests...");

    axum::serve(listener, server::router(state)).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        circuit_game_server::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        circuit_game_server::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
