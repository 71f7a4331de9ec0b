//! Retrieval helpers: similarity search by text and exhaustive filtered scans.

use tracing::{debug, trace};

use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::record::{RagFilter, RagHit, RagPoint};
use crate::VectorStore;

/// Embeds `text` and returns the `top_k` nearest hits with payloads.
///
/// # Errors
/// Returns embedding/provider errors or store failures.
pub async fn search_by_text(
    store: &dyn VectorStore,
    provider: &dyn EmbeddingsProvider,
    text: &str,
    top_k: u64,
) -> Result<Vec<RagHit>, RagError> {
    trace!(target: "rag_store::retrieve", top_k, query_len = text.len(), "search_by_text");
    let qv = provider.embed(text).await?;
    store.search(qv, top_k, None).await
}

/// Collects every point matching `filter`, one page of `page_size` at a time.
///
/// Stops when a page is shorter than `page_size` or the store reports no
/// further cursor. Points are returned in store order.
///
/// # Errors
/// The first failing page aborts the scan.
pub async fn scroll_all(
    store: &dyn VectorStore,
    filter: &RagFilter,
    page_size: u32,
) -> Result<Vec<RagPoint>, RagError> {
    if page_size == 0 {
        return Err(RagError::Config("page_size must be > 0".into()));
    }

    let mut out = Vec::new();
    let mut offset = None;
    let mut pages = 0usize;

    loop {
        let page = store.scroll(filter, page_size, offset).await?;
        pages += 1;
        let got = page.points.len();
        out.extend(page.points);

        if got < page_size as usize {
            break;
        }
        match page.next_offset {
            Some(next) => offset = Some(next),
            None => break,
        }
    }

    debug!(target: "rag_store::retrieve", pages, points = out.len(), "scroll_all completed");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::record::{Payload, PointKey, ScrollPage};
    use crate::BoxFuture;

    /// Serves `total` points in id order, honoring limit/offset like Qdrant.
    struct PagedStore {
        total: u64,
        /// Report a cursor even on the last full page.
        cursor_past_end: bool,
        calls: Mutex<Vec<Option<PointKey>>>,
    }

    impl PagedStore {
        fn new(total: u64) -> Self {
            Self {
                total,
                cursor_past_end: false,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl VectorStore for PagedStore {
        fn search<'a>(
            &'a self,
            _vector: Vec<f32>,
            _top_k: u64,
            _filter: Option<&'a RagFilter>,
        ) -> BoxFuture<'a, Result<Vec<RagHit>, RagError>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn scroll<'a>(
            &'a self,
            _filter: &'a RagFilter,
            limit: u32,
            offset: Option<PointKey>,
        ) -> BoxFuture<'a, Result<ScrollPage, RagError>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(offset.clone());
                let start = match offset {
                    Some(PointKey::Num(n)) => n,
                    _ => 0,
                };
                let end = (start + limit as u64).min(self.total);
                let points = (start..end)
                    .map(|i| {
                        let mut payload = Payload::new();
                        payload.insert("text".into(), json!(format!("part {i}")));
                        RagPoint {
                            id: Some(PointKey::Num(i)),
                            payload,
                        }
                    })
                    .collect();
                let next_offset = if end < self.total || self.cursor_past_end {
                    Some(PointKey::Num(end))
                } else {
                    None
                };
                Ok(ScrollPage {
                    points,
                    next_offset,
                })
            })
        }
    }

    #[tokio::test]
    async fn pages_until_exhausted() {
        let store = PagedStore::new(250);
        let f = RagFilter::equals("ticket_id", "T1");
        let pts = scroll_all(&store, &f, 100).await.unwrap();

        assert_eq!(pts.len(), 250);
        assert_eq!(pts[0].id, Some(PointKey::Num(0)));
        assert_eq!(pts[249].id, Some(PointKey::Num(249)));
        let calls = store.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![None, Some(PointKey::Num(100)), Some(PointKey::Num(200))]
        );
    }

    #[tokio::test]
    async fn exact_multiple_stops_on_missing_cursor() {
        let store = PagedStore::new(200);
        let f = RagFilter::equals("ticket_id", "T1");
        let pts = scroll_all(&store, &f, 100).await.unwrap();
        assert_eq!(pts.len(), 200);
        assert_eq!(store.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn exact_multiple_with_dangling_cursor_reads_one_empty_page() {
        let store = PagedStore {
            cursor_past_end: true,
            ..PagedStore::new(200)
        };
        let f = RagFilter::equals("ticket_id", "T1");
        let pts = scroll_all(&store, &f, 100).await.unwrap();
        assert_eq!(pts.len(), 200);
        assert_eq!(store.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn empty_result_is_single_call() {
        let store = PagedStore::new(0);
        let pts = scroll_all(&store, &RagFilter::equals("ticket_id", 9), 100)
            .await
            .unwrap();
        assert!(pts.is_empty());
        assert_eq!(store.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let store = PagedStore::new(10);
        let err = scroll_all(&store, &RagFilter::default(), 0).await.unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }
}
