//! Embedding provider backed by the shared LLM profiles.

use std::sync::Arc;

use ai_llm_service::{AiLlmError, LlmServiceProfiles, ProviderError, ProviderErrorKind};
use tracing::warn;

use crate::{BoxFuture, EmbeddingsProvider, RagError};

/// Embeds text with the **embedding** profile of [`LlmServiceProfiles`].
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        Box::pin(async move {
            self.svc.embed(text).await.map_err(|e| {
                warn!(target: "rag_store::embed", error = %e, "embedding failed");
                map_llm_error(e)
            })
        })
    }
}

fn map_llm_error(e: AiLlmError) -> RagError {
    match e {
        AiLlmError::Provider(ProviderError {
            kind: ProviderErrorKind::DimensionMismatch { expected, got },
            ..
        }) => RagError::VectorSizeMismatch {
            got,
            want: expected,
        },
        other => RagError::Embedding(other.to_string()),
    }
}
