use crate::BoxFuture;
use crate::errors::RagError;

/// Provider interface for query embeddings.
///
/// Async because every real provider performs an HTTP request.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>>;
}

pub mod llm;
