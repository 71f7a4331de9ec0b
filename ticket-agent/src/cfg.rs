//! Runtime configuration and fixed agent identity.

use rag_store::RagConfig;

use crate::error::AgentError;

/// Collection holding ticket fragments.
pub const COLLECTION: &str = "zendesk";
pub const DEFAULT_LIMIT: u64 = 5;

pub const APP_NAME: &str = "ZendeskSupportApp";
pub const AGENT_NAME: &str = "zendesk_search_agent";
pub const AGENT_DESCRIPTION: &str = "Agent to answer questions using Zendesk ticket data.";
pub const AGENT_INSTRUCTION: &str = "You are an expert customer support analyst. \
Answer questions based only on the provided ticket summaries. Be precise and helpful.";

/// Config bag for the pipeline. All fields have defaults via `from_env`.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Store connection, bound to [`COLLECTION`].
    pub rag: RagConfig,
    /// Result count used when a caller does not pass one (`RAG_TOP_K`).
    pub default_limit: u64,
}

impl AgentConfig {
    /// Build from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, AgentError> {
        let rag = RagConfig::from_env(COLLECTION)?;
        let default_limit = match std::env::var("RAG_TOP_K") {
            Ok(v) if !v.trim().is_empty() => parse_limit(&v)?,
            _ => DEFAULT_LIMIT,
        };
        Ok(Self { rag, default_limit })
    }

    /// Defaults against a given Qdrant URL; handy for tests and tools.
    pub fn with_url(qdrant_url: &str) -> Self {
        Self {
            rag: RagConfig::new_default(qdrant_url, COLLECTION),
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.rag.page_size
    }
}

fn parse_limit(v: &str) -> Result<u64, AgentError> {
    match v.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AgentError::Config(format!(
            "RAG_TOP_K: expected positive integer, got {v:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_must_be_positive() {
        assert_eq!(parse_limit(" 8 ").unwrap(), 8);
        assert!(parse_limit("0").is_err());
        assert!(parse_limit("-3").is_err());
        assert!(parse_limit("many").is_err());
    }

    #[test]
    fn defaults_target_ticket_collection() {
        let cfg = AgentConfig::with_url("http://localhost:6334");
        assert_eq!(cfg.rag.collection, "zendesk");
        assert_eq!(cfg.default_limit, 5);
        assert_eq!(cfg.page_size(), 100);
    }
}
