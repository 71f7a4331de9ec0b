use std::sync::Arc;

use axum::{Json, extract::State};
use ticket_agent::AgentInfo;

use crate::core::app_state::AppState;

/// Handler: GET /agent-info
pub async fn agent_info(State(state): State<Arc<AppState>>) -> Json<AgentInfo> {
    Json(state.agent.info())
}
