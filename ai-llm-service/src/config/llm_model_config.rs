use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32};

/// Configuration for one LLM profile (chat or embedding).
///
/// # Fields
///
/// - `provider`: backend family (Ollama, OpenAI-compatible).
/// - `model`: model identifier (e.g. `"qwen3:14b"`, `"bge-m3"`).
/// - `endpoint`: base URL. For OpenAI-compatible servers it includes the
///   version segment (`https://api.openai.com/v1`).
/// - `api_key`: bearer token, never defaulted.
/// - `max_tokens`, `temperature`, `top_p`: generation options.
/// - `timeout_secs`: request timeout in seconds.
/// - `dimension`: expected embedding length, checked when set.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub dimension: Option<usize>,
}

impl LlmModelConfig {
    /// Checks the invariants every provider client relies on.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyModel`] for a blank model id
    /// - [`ConfigError::InvalidFormat`] for a non-HTTP endpoint
    /// - [`ConfigError::MissingVar`] when the provider needs a key and none is set
    /// - [`ConfigError::OutOfRange`] for sampling values outside their range
    pub fn validate(&self, key_var: &'static str) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("endpoint", self.endpoint.trim())?;
        if self.provider.requires_api_key()
            && self.api_key.as_deref().is_none_or(|k| k.trim().is_empty())
        {
            return Err(ConfigError::MissingVar(key_var).into());
        }
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AiLlmError;

    fn base() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.2),
            top_p: None,
            timeout_secs: Some(60),
            dimension: None,
        }
    }

    #[test]
    fn ollama_without_key_is_valid() {
        assert!(base().validate("LLM_API_KEY").is_ok());
    }

    #[test]
    fn openai_requires_key() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::OpenAI,
            endpoint: "https://api.openai.com/v1".into(),
            ..base()
        };
        let err = cfg.validate("LLM_API_KEY").unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("LLM_API_KEY"))
        ));
    }

    #[test]
    fn rejects_bad_endpoint_and_empty_model() {
        let cfg = LlmModelConfig {
            endpoint: "localhost:11434".into(),
            ..base()
        };
        assert!(cfg.validate("LLM_API_KEY").is_err());

        let cfg = LlmModelConfig {
            model: "  ".into(),
            ..base()
        };
        assert!(matches!(
            cfg.validate("LLM_API_KEY").unwrap_err(),
            AiLlmError::Config(ConfigError::EmptyModel)
        ));
    }
}
