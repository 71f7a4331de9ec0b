//! Profile configs loaded from environment variables.
//!
//! Two roles are supported:
//!
//! - **Chat**      → summarization and answer synthesis
//! - **Embedding** → query vectors for similarity search
//!
//! # Environment variables
//!
//! Chat:
//! - `LLM_KIND`         = `ollama` (default) or `openai`
//! - `LLM_URL`          = endpoint; falls back to `OLLAMA_URL`, then the provider default
//! - `LLM_API_KEY`      = bearer key (required for `openai`, never defaulted)
//! - `LLM_MODEL`        = chat model (default `qwen3:14b`)
//! - `LLM_MAX_TOKENS`   = optional generation cap
//! - `LLM_TIMEOUT_SECS` = request timeout (default 60)
//!
//! Embedding:
//! - `EMBEDDING_KIND`, `EMBEDDING_URL`, `EMBEDDING_API_KEY`, `EMBEDDING_MODEL`
//!   (default `bge-m3`), `EMBEDDING_TIMEOUT_SECS` (default 60)
//! - `EMBEDDING_DIM`    = optional expected vector length

use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{Result, non_empty, parse_opt},
};

pub const DEFAULT_CHAT_MODEL: &str = "qwen3:14b";
pub const DEFAULT_EMBEDDING_MODEL: &str = "bge-m3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat profile from the process environment.
pub fn config_chat_from_env() -> Result<LlmModelConfig> {
    config_chat_from(|k| std::env::var(k).ok())
}

/// Embedding profile from the process environment.
pub fn config_embedding_from_env() -> Result<LlmModelConfig> {
    config_embedding_from(|k| std::env::var(k).ok())
}

/// Chat profile from an arbitrary variable lookup.
///
/// # Errors
/// Unknown provider kind, malformed numbers, or a missing key for `openai`.
pub fn config_chat_from<F>(lookup: F) -> Result<LlmModelConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |k: &str| non_empty(lookup(k));

    let provider = match get("LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Ollama,
    };
    let endpoint = get("LLM_URL")
        .or_else(|| match provider {
            LlmProvider::Ollama => get("OLLAMA_URL"),
            LlmProvider::OpenAI => None,
        })
        .unwrap_or_else(|| provider.default_endpoint().to_string());

    let cfg = LlmModelConfig {
        provider,
        model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
        endpoint,
        api_key: get("LLM_API_KEY"),
        max_tokens: parse_opt("LLM_MAX_TOKENS", lookup("LLM_MAX_TOKENS"), "expected u32")?,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(
            parse_opt("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"), "expected u64")?
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
        dimension: None,
    };
    cfg.validate("LLM_API_KEY")?;

    debug!(target: "ai_llm_service::config", provider = %cfg.provider, model = %cfg.model, endpoint = %cfg.endpoint, "chat profile loaded");
    Ok(cfg)
}

/// Embedding profile from an arbitrary variable lookup.
///
/// # Errors
/// Unknown provider kind, malformed numbers, or a missing key for `openai`.
pub fn config_embedding_from<F>(lookup: F) -> Result<LlmModelConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |k: &str| non_empty(lookup(k));

    let provider = match get("EMBEDDING_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Ollama,
    };
    let endpoint = get("EMBEDDING_URL")
        .or_else(|| match provider {
            LlmProvider::Ollama => get("OLLAMA_URL"),
            LlmProvider::OpenAI => None,
        })
        .unwrap_or_else(|| provider.default_endpoint().to_string());

    let cfg = LlmModelConfig {
        provider,
        model: get("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        endpoint,
        api_key: get("EMBEDDING_API_KEY"),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(
            parse_opt(
                "EMBEDDING_TIMEOUT_SECS",
                lookup("EMBEDDING_TIMEOUT_SECS"),
                "expected u64",
            )?
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
        dimension: parse_opt("EMBEDDING_DIM", lookup("EMBEDDING_DIM"), "expected usize")?,
    };
    cfg.validate("EMBEDDING_API_KEY")?;

    debug!(target: "ai_llm_service::config", provider = %cfg.provider, model = %cfg.model, dim = ?cfg.dimension, "embedding profile loaded");
    Ok(cfg)
}
