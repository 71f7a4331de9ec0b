//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Provider clients are built eagerly, so bad config fails at startup.
//! - Profiles with identical connection settings share one HTTP client.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, Provider, ProviderError, ProviderErrorKind, Result},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Concrete provider client behind a profile.
#[derive(Debug)]
enum ProviderClient {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl ProviderClient {
    fn build(cfg: &LlmModelConfig) -> Result<Self> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => Self::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::OpenAI => Self::OpenAI(OpenAiService::new(cfg.clone())?),
        })
    }

    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        match self {
            Self::Ollama(c) => c.generate(prompt, system).await,
            Self::OpenAI(c) => c.generate(prompt, system).await,
        }
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        match self {
            Self::Ollama(c) => c.embeddings(input).await,
            Self::OpenAI(c) => c.embeddings(input).await,
        }
    }
}

/// Profile config plus its (possibly shared) client.
#[derive(Debug)]
struct Profile {
    cfg: LlmModelConfig,
    client: Arc<ProviderClient>,
}

/// Shared service managing the **chat** and **embedding** profiles.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    chat: Profile,
    embedding: Profile,
}

impl LlmServiceProfiles {
    /// Builds both profiles and their clients.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if either client cannot be constructed.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self> {
        let mut cache: HashMap<ClientKey, Arc<ProviderClient>> = HashMap::new();
        let chat = Self::profile(chat, &mut cache)?;
        let embedding = Self::profile(embedding, &mut cache)?;

        info!(
            target: "ai_llm_service::profiles",
            chat_provider = %chat.cfg.provider,
            chat_model = %chat.cfg.model,
            embedding_provider = %embedding.cfg.provider,
            embedding_model = %embedding.cfg.model,
            clients = cache.len(),
            "LLM profiles ready"
        );

        Ok(Self { chat, embedding })
    }

    /// Loads both profiles from the environment and builds the service.
    pub fn from_env() -> Result<Self> {
        Self::new(
            crate::config_chat_from_env()?,
            crate::config_embedding_from_env()?,
        )
    }

    /// Generates text with the **chat** profile.
    ///
    /// `system` is sent as the system message / Ollama `system` field.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        self.chat.client.generate(prompt, system).await
    }

    /// Computes one embedding with the **embedding** profile.
    ///
    /// # Errors
    /// Besides provider errors, returns `DimensionMismatch` when the profile
    /// declares a dimension and the vector length differs.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        let v = self.embedding.client.embed(input).await?;
        if let Some(expected) = self.embedding.cfg.dimension {
            if v.len() != expected {
                let provider = match self.embedding.cfg.provider {
                    LlmProvider::Ollama => Provider::Ollama,
                    LlmProvider::OpenAI => Provider::OpenAI,
                };
                return Err(AiLlmError::from(ProviderError::new(
                    provider,
                    ProviderErrorKind::DimensionMismatch {
                        expected,
                        got: v.len(),
                    },
                )));
            }
        }
        Ok(v)
    }

    /// Chat profile config.
    pub fn chat_profile(&self) -> &LlmModelConfig {
        &self.chat.cfg
    }

    /// Embedding profile config.
    pub fn embedding_profile(&self) -> &LlmModelConfig {
        &self.embedding.cfg
    }

    fn profile(
        cfg: LlmModelConfig,
        cache: &mut HashMap<ClientKey, Arc<ProviderClient>>,
    ) -> Result<Profile> {
        let key = ClientKey::from(&cfg);
        let client = match cache.get(&key) {
            Some(c) => {
                debug!(target: "ai_llm_service::profiles", model = %cfg.model, "reusing client");
                c.clone()
            }
            None => {
                let c = Arc::new(ProviderClient::build(&cfg)?);
                cache.insert(key, c.clone());
                c
            }
        };
        Ok(Profile { cfg, client })
    }
}

/// Cache key identifying clients with the same connection and request settings.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
    max_tokens: Option<u32>,
    temperature_bits: Option<u32>,
    top_p_bits: Option<u32>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
            max_tokens: cfg.max_tokens,
            temperature_bits: cfg.temperature.map(f32::to_bits),
            top_p_bits: cfg.top_p.map(f32::to_bits),
        }
    }
}
