//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions live behind this facade so the rest of the
//! workspace only sees JSON payloads and [`PointKey`]s.

use std::collections::HashMap;
use std::time::Duration;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Filter, PointId, ScrollPointsBuilder, SearchParamsBuilder, SearchPointsBuilder,
    Value as QValue,
};
use tracing::{debug, info};

use crate::config::RagConfig;
use crate::errors::RagError;
use crate::record::{Payload, PointKey, RagHit, RagPoint, ScrollPage};

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    exact: bool,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// The gRPC channel is lazy, so no request is made here.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder =
            Qdrant::from_url(&cfg.qdrant_url).timeout(Duration::from_secs(cfg.timeout_secs));
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder.build()?;

        info!(target: "rag_store::qdrant", url = %cfg.qdrant_url, collection = %cfg.collection, "Qdrant client ready");

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            exact: cfg.exact_search,
        })
    }

    /// Similarity search; hits are sorted by score, best first.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<Filter>,
    ) -> Result<Vec<RagHit>, RagError> {
        debug!(
            target: "rag_store::qdrant",
            collection = %self.collection, top_k, exact = self.exact, filtered = filter.is_some(),
            "search"
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if let Some(f) = filter {
            builder = builder.filter(f);
        }
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self.client.search_points(builder).await?;

        let hits: Vec<RagHit> = res
            .result
            .into_iter()
            .map(|p| RagHit {
                id: PointKey::from_qdrant(p.id),
                score: p.score,
                payload: qpayload_to_json(p.payload),
            })
            .collect();

        debug!(target: "rag_store::qdrant", hits = hits.len(), "search completed");
        Ok(hits)
    }

    /// Reads one page of points matching `filter`, starting at `offset`.
    pub async fn scroll_page(
        &self,
        filter: Filter,
        limit: u32,
        offset: Option<PointKey>,
    ) -> Result<ScrollPage, RagError> {
        debug!(target: "rag_store::qdrant", collection = %self.collection, limit, offset = ?offset, "scroll");

        let mut builder = ScrollPointsBuilder::new(&self.collection)
            .filter(filter)
            .limit(limit)
            .with_payload(true)
            .with_vectors(false);
        if let Some(o) = offset {
            builder = builder.offset(PointId::from(o));
        }

        let res = self.client.scroll(builder).await?;

        let points = res
            .result
            .into_iter()
            .map(|p| RagPoint {
                id: PointKey::from_qdrant(p.id),
                payload: qpayload_to_json(p.payload),
            })
            .collect();

        Ok(ScrollPage {
            points,
            next_offset: PointKey::from_qdrant(res.next_page_offset),
        })
    }
}

/// Converts a Qdrant payload into a JSON object, nested values included.
pub(crate) fn qpayload_to_json(p: HashMap<String, QValue>) -> Payload {
    p.into_iter().map(|(k, v)| (k, v.into_json())).collect()
}
