use std::sync::Arc;

use ticket_agent::TicketSearchAgent;

use crate::error_handler::AppError;

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline built once at startup.
    pub agent: Arc<TicketSearchAgent>,
}

impl AppState {
    pub fn new(agent: Arc<TicketSearchAgent>) -> Self {
        Self { agent }
    }
}

/// Listener settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub address: String,
}

impl ServerConfig {
    /// `API_ADDRESS`, defaulting to `0.0.0.0:8000`.
    pub fn from_env() -> Result<Self, AppError> {
        let address = match std::env::var("API_ADDRESS") {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            Ok(_) | Err(std::env::VarError::NotPresent) => DEFAULT_API_ADDRESS.to_string(),
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(AppError::Config("API_ADDRESS is not valid UTF-8".into()));
            }
        };
        Ok(Self { address })
    }
}
