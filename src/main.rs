mod api;
mod config;
mod error;
mod fare;
mod geo;
mod models;
mod notify;
mod observability;
mod routing;
mod state;
mod workflow;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::routing::{OsrmResolver, RouteResolver, RoutingDisabled};

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let route_resolver: Arc<dyn RouteResolver> = match &config.route_service_url {
        Some(url) => {
            tracing::info!(url = %url, "routing service configured");
            Arc::new(OsrmResolver::new(
                url.clone(),
                Duration::from_millis(config.route_timeout_ms),
            )?)
        }
        None => {
            tracing::warn!("no routing service configured; estimates use straight-line distance");
            Arc::new(RoutingDisabled)
        }
    };

    let shared_state = Arc::new(state::AppState::new(
        config.event_buffer_size,
        route_resolver,
    ));

    let app = api::rest::router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| error::AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| error::AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
