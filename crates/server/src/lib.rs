//! GSBot server library.
//!
//! Provides a reusable server function to serve GSBot either for the binary, or for the integration tests.

#![deny(missing_docs)]

mod cors;
mod health;

use std::net::SocketAddr;

use anyhow::{anyhow, bail};
use axum::{Router, routing::get};
use config::Config;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Configuration for serving GSBot.
pub struct ServeConfig {
    /// The socket address (IP and port) the server will bind to
    pub listen_address: SocketAddr,
    /// The deserialized GSBot TOML configuration.
    pub config: Config,
}

/// Builds the application router from the configuration.
pub fn app(config: Config) -> anyhow::Result<Router> {
    let Config { server, chat } = config;

    let cors = match &server.cors {
        Some(cors_config) => cors::generate(cors_config)?,
        None => CorsLayer::permissive(),
    };

    for path in [&chat.path, &server.health.path] {
        if !path.starts_with('/') {
            bail!("Endpoint path '{path}' must start with '/'");
        }
    }

    if chat.enabled() && server.health.enabled && chat.path == server.health.path {
        bail!("The chat and health endpoints cannot share the path '{}'", chat.path);
    }

    let mut app = Router::new();

    if chat.enabled() {
        let path = chat.path.clone();
        app = app.merge(chat::router(chat)?);

        log::debug!("Chat endpoint mounted at {path}");
    } else {
        log::warn!("Chat endpoint is disabled, the server will only answer health checks");
    }

    if server.health.enabled {
        app = app.route(&server.health.path, get(health::health));
    }

    Ok(app.layer(cors))
}

/// Starts and runs the GSBot server with the provided configuration.
///
/// Returns once the process receives Ctrl-C and in-flight requests are done.
pub async fn serve(ServeConfig { listen_address, config }: ServeConfig) -> anyhow::Result<()> {
    let chat_path = config.chat.enabled().then(|| config.chat.path.clone());
    let app = app(config)?;

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    if let Some(path) = chat_path {
        log::info!("Chat endpoint available at: http://{listen_address}{path}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("Failed to start HTTP server: {e}"))?;

    log::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            // Without a signal handler the server can only be stopped by killing it
            log::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await
        }
    }
}
