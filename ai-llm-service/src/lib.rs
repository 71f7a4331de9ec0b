//! Shared LLM access for the ticket search backend.
//!
//! The crate wraps two provider families behind one profile-based service:
//! local **Ollama** and any **OpenAI-compatible** endpoint. A single
//! [`LlmServiceProfiles`] instance is built at startup, wrapped in `Arc`,
//! and shared by the retrieval layer (embeddings) and the agent layer (chat).

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::default_config::{config_chat_from_env, config_embedding_from_env};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind, Result};
pub use service_profiles::LlmServiceProfiles;
