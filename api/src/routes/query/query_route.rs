//! GET /query: runs the ticket search pipeline.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use ticket_agent::SearchResult;
use tracing::{debug, error, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::query::query_request::QueryParams,
};

/// Handler: GET /query
///
/// Stage failures are reported inside the answer text with a `200`. Only a
/// panicked or cancelled pipeline task maps to `500`.
///
/// # Example
/// ```bash
/// curl 'http://127.0.0.1:8000/query?search_term=refund%20delays'
/// ```
pub async fn query(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> AppResult<Json<SearchResult>> {
    let Query(QueryParams { search_term }) = params?;
    let limit = state.agent.default_limit();

    debug!(target: "api::query", query = %search_term, limit, "query: start");

    let agent = state.agent.clone();
    let result = tokio::spawn(async move { agent.execute(&search_term, limit).await })
        .await
        .map_err(|e| {
            error!(target: "api::query", error = %e, "query: pipeline task failed");
            AppError::from(e)
        })?;

    if result.is_failure() {
        warn!(target: "api::query", outcome = ?result.outcome, "query: degraded result");
    } else {
        debug!(
            target: "api::query",
            tickets = result.ticket_summaries.len(),
            "query: success"
        );
    }

    Ok(Json(result))
}
