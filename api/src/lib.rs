//! Front ends for the ticket search agent: an axum HTTP API and an MCP
//! tool server over stdio. Both share one [`TicketSearchAgent`].

use std::sync::Arc;

use axum::{Router, routing::get};
use rmcp::{ServiceExt, transport::stdio};
use ticket_agent::TicketSearchAgent;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

mod core;
mod error_handler;
mod mcp;
mod routes;

pub use crate::core::app_state::{AppState, DEFAULT_API_ADDRESS, ServerConfig};
pub use crate::error_handler::{AppError, AppResult};
pub use crate::mcp::{SEARCH_TOOL, SERVER_NAME, TicketSearchMcp};

use crate::routes::{
    agent_info_route::agent_info, health_route::health, query::query_route::query,
};

/// Builds the HTTP router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/agent-info", get(agent_info))
        .route("/query", get(query))
        .layer(cors)
        .with_state(state)
}

/// Serves the HTTP API on `API_ADDRESS` until Ctrl+C.
pub async fn start(agent: Arc<TicketSearchAgent>) -> Result<(), AppError> {
    let cfg = ServerConfig::from_env()?;
    let app = router(Arc::new(AppState::new(agent)));

    let listener = tokio::net::TcpListener::bind(&cfg.address)
        .await
        .map_err(|source| AppError::Bind {
            address: cfg.address.clone(),
            source,
        })?;

    info!(target: "api", address = %cfg.address, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!(target: "api", "HTTP server stopped");
    Ok(())
}

/// Serves the MCP tool protocol on stdin/stdout until the peer disconnects.
pub async fn serve_mcp(agent: Arc<TicketSearchAgent>) -> Result<(), AppError> {
    info!(target: "api::mcp", "MCP server starting on stdio");

    let service = TicketSearchMcp::new(agent)
        .serve(stdio())
        .await
        .map_err(|e| AppError::Mcp(e.to_string()))?;
    service
        .waiting()
        .await
        .map_err(|e| AppError::Mcp(e.to_string()))?;

    info!(target: "api::mcp", "MCP server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(target: "api", error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target: "api", "shutdown signal received");
}
