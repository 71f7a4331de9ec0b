//! Retrieval facade over Qdrant.
//!
//! This crate provides:
//! - Similarity search over one collection with JSON payloads
//! - Exhaustive exact-match scans (paginated scroll) for metadata filters
//! - The [`EmbeddingsProvider`] seam and an implementation over `ai-llm-service`
//!
//! Application code depends on the [`VectorStore`] trait so tests can swap
//! Qdrant for an in-memory double.

mod config;
mod embed;
mod errors;
mod filters;
mod qdrant_facade;
mod record;
mod retrieve;

use std::{future::Future, pin::Pin};

pub use config::{DEFAULT_PAGE_SIZE, RagConfig};
pub use embed::EmbeddingsProvider;
pub use embed::llm::LlmEmbedder;
pub use errors::RagError;
pub use record::{Payload, PointKey, RagFilter, RagHit, RagPoint, ScrollPage};
pub use retrieve::{scroll_all, search_by_text};

use tracing::trace;

/// Boxed `Send` future used at the async trait seams of this workspace.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Collection-bound vector store operations.
pub trait VectorStore: Send + Sync {
    /// Nearest-neighbor search returning hits with payloads.
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&'a RagFilter>,
    ) -> BoxFuture<'a, Result<Vec<RagHit>, RagError>>;

    /// One page of points matching `filter`.
    fn scroll<'a>(
        &'a self,
        filter: &'a RagFilter,
        limit: u32,
        offset: Option<PointKey>,
    ) -> BoxFuture<'a, Result<ScrollPage, RagError>>;
}

/// High-level facade that wires configuration and the Qdrant client.
///
/// This is the single entry point recommended for application code.
pub struct RagStore {
    client: qdrant_facade::QdrantFacade,
}

impl RagStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `RagError::Config` for invalid settings and `RagError::Qdrant`
    /// if the client cannot be built.
    pub fn new(cfg: RagConfig) -> Result<Self, RagError> {
        trace!(target: "rag_store", collection = %cfg.collection, "RagStore::new");
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { client })
    }
}

impl VectorStore for RagStore {
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&'a RagFilter>,
    ) -> BoxFuture<'a, Result<Vec<RagHit>, RagError>> {
        Box::pin(async move {
            let qfilter = filter.map(filters::to_qdrant_filter).transpose()?;
            self.client.search(vector, top_k, qfilter).await
        })
    }

    fn scroll<'a>(
        &'a self,
        filter: &'a RagFilter,
        limit: u32,
        offset: Option<PointKey>,
    ) -> BoxFuture<'a, Result<ScrollPage, RagError>> {
        Box::pin(async move {
            let qfilter = filters::to_qdrant_filter(filter)?;
            self.client.scroll_page(qfilter, limit, offset).await
        })
    }
}
