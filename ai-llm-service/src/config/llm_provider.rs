use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Backend used for chat generation or embeddings.
///
/// `OpenAI` covers every server that speaks the OpenAI REST dialect
/// (`/chat/completions`, `/embeddings`), including hosted Gemini through
/// its OpenAI-compatible base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI or an OpenAI-compatible API.
    OpenAI,
}

impl LlmProvider {
    /// Endpoint used when no URL is configured for the profile.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            LlmProvider::Ollama => "http://localhost:11434",
            LlmProvider::OpenAI => "https://api.openai.com/v1",
        }
    }

    /// Whether requests to this provider need an API key.
    pub fn requires_api_key(self) -> bool {
        matches!(self, LlmProvider::OpenAI)
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" | "openai-compatible" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Ollama => f.write_str("ollama"),
            LlmProvider::OpenAI => f.write_str("openai"),
        }
    }
}
