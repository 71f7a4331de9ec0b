//! Runtime configuration for the Qdrant connection and scans.

use crate::errors::RagError;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for retrieval over one collection.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Points per page for filtered scans.
    pub page_size: u32,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl RagConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            page_size: DEFAULT_PAGE_SIZE,
            exact_search: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads connection settings from the environment for `collection`.
    ///
    /// - `QDRANT_URL` (default `http://localhost:6334`)
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_TIMEOUT_SECS` (default 30)
    /// - `RAG_PAGE_SIZE` (default 100)
    /// - `RAG_EXACT_SEARCH` (`true`/`false`, default false)
    pub fn from_env(collection: impl Into<String>) -> Result<Self, RagError> {
        Self::from_lookup(collection, |k| std::env::var(k).ok())
    }

    /// Same as [`RagConfig::from_env`] over an arbitrary lookup.
    pub fn from_lookup<F>(collection: impl Into<String>, lookup: F) -> Result<Self, RagError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut cfg = Self::new_default(
            get("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string()),
            collection,
        );
        cfg.qdrant_api_key = get("QDRANT_API_KEY");
        if let Some(v) = get("QDRANT_TIMEOUT_SECS") {
            cfg.timeout_secs = v
                .parse()
                .map_err(|_| RagError::Config(format!("QDRANT_TIMEOUT_SECS: expected u64, got {v:?}")))?;
        }
        if let Some(v) = get("RAG_PAGE_SIZE") {
            cfg.page_size = v
                .parse()
                .map_err(|_| RagError::Config(format!("RAG_PAGE_SIZE: expected u32, got {v:?}")))?;
        }
        if let Some(v) = get("RAG_EXACT_SEARCH") {
            cfg.exact_search = v
                .parse()
                .map_err(|_| RagError::Config(format!("RAG_EXACT_SEARCH: expected bool, got {v:?}")))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.page_size == 0 {
            return Err(RagError::Config("page_size must be > 0".into()));
        }
        if self.timeout_secs == 0 {
            return Err(RagError::Config("timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_when_env_is_empty() {
        let env: HashMap<&str, String> = HashMap::new();
        let cfg = RagConfig::from_lookup("zendesk", |k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.qdrant_url, DEFAULT_QDRANT_URL);
        assert_eq!(cfg.collection, "zendesk");
        assert_eq!(cfg.page_size, 100);
        assert!(cfg.qdrant_api_key.is_none());
    }

    #[test]
    fn overrides_and_rejects_zero_page() {
        let env: HashMap<&str, String> = [
            ("QDRANT_URL", "http://qdrant:6334".to_string()),
            ("QDRANT_API_KEY", "secret".to_string()),
            ("RAG_PAGE_SIZE", "25".to_string()),
        ]
        .into_iter()
        .collect();
        let cfg = RagConfig::from_lookup("zendesk", |k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.qdrant_url, "http://qdrant:6334");
        assert_eq!(cfg.qdrant_api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.page_size, 25);

        let env: HashMap<&str, String> = [("RAG_PAGE_SIZE", "0".to_string())].into_iter().collect();
        assert!(matches!(
            RagConfig::from_lookup("zendesk", |k| env.get(k).cloned()),
            Err(RagError::Config(_))
        ));
    }
}
