//! Typed errors for the ticket-agent crate.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Errors from the underlying rag-store crate.
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),

    /// Language-model call failed.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Invalid runtime configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A session with the same identity is already open.
    #[error("session `{session_id}` already exists for user `{user_id}`")]
    SessionExists { user_id: String, session_id: String },

    /// The session was closed or never created.
    #[error("session `{session_id}` not found for user `{user_id}`")]
    SessionNotFound { user_id: String, session_id: String },
}

impl From<ai_llm_service::AiLlmError> for AgentError {
    fn from(e: ai_llm_service::AiLlmError) -> Self {
        AgentError::Llm(e.to_string())
    }
}

/// Pipeline stage whose failure aborts a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Search,
    Answer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Search => f.write_str("search"),
            Stage::Answer => f.write_str("answer"),
        }
    }
}

/// Request-level failure tagged with the stage it came from.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: AgentError,
}

impl StageError {
    pub fn search(source: impl Into<AgentError>) -> Self {
        Self {
            stage: Stage::Search,
            source: source.into(),
        }
    }

    pub fn answer(source: impl Into<AgentError>) -> Self {
        Self {
            stage: Stage::Answer,
            source: source.into(),
        }
    }
}
