//! Retrieval-summarization pipeline.
//!
//! Stages, strictly sequential:
//! 1. similarity search over ticket fragments
//! 2. ticket-id extraction (deduplicated, first-seen order)
//! 3. exhaustive fragment scan per ticket
//! 4. one summary per ticket, each in its own session
//! 5. answer synthesis over all summaries

use std::collections::HashSet;
use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use rag_store::{
    EmbeddingsProvider, LlmEmbedder, Payload, RagFilter, RagHit, RagPoint, RagStore, VectorStore,
    scroll_all, search_by_text,
};
use tracing::{debug, error, info, instrument, warn};

use crate::agent::{LanguageModel, LlmAgent, Runner};
use crate::api_types::{AgentInfo, SearchOutcome, SearchResult, TicketId, TicketSummary};
use crate::cfg::{APP_NAME, AgentConfig};
use crate::error::{AgentError, Stage, StageError};
use crate::prompt;
use crate::session::{InMemorySessionService, RequestScope, query_digest};

pub const NO_RELEVANT_TICKETS: &str = "No relevant information found for your query.";
pub const NO_SUMMARIES: &str =
    "I couldn't find any relevant information to answer your question.";
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary available";
pub const NO_ANSWER_PLACEHOLDER: &str = "No answer could be generated.";

const TICKET_ID_FIELD: &str = "ticket_id";
const TEXT_FIELD: &str = "text";
const VECTOR_FIELD: &str = "vector";

const SUMMARIZER_USER: &str = "system";
const ASKER_USER: &str = "user";

/// All fragments of one ticket in store order.
#[derive(Clone, Debug)]
pub struct TicketFragments {
    pub ticket_id: TicketId,
    pub fragments: Vec<RagPoint>,
}

/// The ticket search agent: shared clients plus the session registry.
///
/// Built once at startup and shared behind `Arc`; requests only own their
/// [`RequestScope`].
pub struct TicketSearchAgent {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingsProvider>,
    runner: Runner,
    collection: String,
    default_limit: u64,
    page_size: u32,
}

impl TicketSearchAgent {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingsProvider>,
        model: Arc<dyn LanguageModel>,
        cfg: &AgentConfig,
    ) -> Self {
        let sessions = Arc::new(InMemorySessionService::new(APP_NAME));
        let runner = Runner::new(LlmAgent::ticket_analyst(model), sessions);
        Self {
            store,
            embedder,
            runner,
            collection: cfg.rag.collection.clone(),
            default_limit: cfg.default_limit,
            page_size: cfg.page_size(),
        }
    }

    /// Wires Qdrant and the LLM profiles from the environment.
    ///
    /// # Errors
    /// Invalid configuration or a client that cannot be built.
    pub fn from_env() -> Result<Self, AgentError> {
        let cfg = AgentConfig::from_env()?;
        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let store = Arc::new(RagStore::new(cfg.rag.clone())?);
        let embedder = Arc::new(LlmEmbedder::new(llm.clone()));

        info!(
            target: "ticket_agent::pipeline",
            collection = %cfg.rag.collection,
            qdrant = %cfg.rag.qdrant_url,
            default_limit = cfg.default_limit,
            page_size = cfg.page_size(),
            "ticket search agent ready"
        );
        Ok(Self::new(store, embedder, llm, &cfg))
    }

    pub fn info(&self) -> AgentInfo {
        let agent = self.runner.agent();
        AgentInfo {
            agent_name: agent.name.clone(),
            description: agent.description.clone(),
            model: agent.model_id().to_string(),
            collection: self.collection.clone(),
        }
    }

    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    pub fn sessions(&self) -> &Arc<InMemorySessionService> {
        self.runner.sessions()
    }

    /// Runs the pipeline and never fails.
    ///
    /// Stage failures are logged and folded into the answer text, with
    /// `ticket_summaries` left empty and `outcome` set to `Failed`.
    pub async fn execute(&self, query: &str, limit: u64) -> SearchResult {
        match self.run(query, limit).await {
            Ok(r) => r,
            Err(e) => {
                error!(target: "ticket_agent::pipeline", stage = %e.stage, error = %e.source, "search request failed");
                let answer = match e.stage {
                    Stage::Search => format!("An error occurred during search: {}", e.source),
                    Stage::Answer => {
                        format!("An error occurred while generating the answer: {}", e.source)
                    }
                };
                SearchResult {
                    query: query.to_string(),
                    ticket_summaries: Vec::new(),
                    answer,
                    outcome: SearchOutcome::Failed {
                        stage: e.stage,
                        message: e.source.to_string(),
                    },
                }
            }
        }
    }

    /// Runs the pipeline, returning the failing stage on error.
    ///
    /// Sessions opened for this call are released before returning.
    #[instrument(target = "ticket_agent::pipeline", skip_all, fields(limit = limit))]
    pub async fn run(&self, query: &str, limit: u64) -> Result<SearchResult, StageError> {
        let mut scope = RequestScope::new(self.runner.sessions().clone());
        let res = self.run_in_scope(&mut scope, query, limit).await;
        scope.close();
        res
    }

    async fn run_in_scope(
        &self,
        scope: &mut RequestScope,
        query: &str,
        limit: u64,
    ) -> Result<SearchResult, StageError> {
        info!(target: "ticket_agent::pipeline", request = %scope.token(), query_len = query.len(), limit, "search started");

        let hits = self.vector_search(query, limit).await.map_err(StageError::search)?;

        let ticket_ids = extract_ticket_ids(&hits);
        debug!(target: "ticket_agent::pipeline", hits = hits.len(), tickets = ticket_ids.len(), "ticket ids extracted");
        if ticket_ids.is_empty() {
            return Ok(SearchResult {
                query: query.to_string(),
                ticket_summaries: Vec::new(),
                answer: NO_RELEVANT_TICKETS.to_string(),
                outcome: SearchOutcome::NoRelevantTickets,
            });
        }

        let tickets = self.fetch_complete_tickets(&ticket_ids).await;
        let summaries = self.summarize_tickets(scope, &tickets).await;

        let (answer, outcome) = if summaries.is_empty() {
            (NO_SUMMARIES.to_string(), SearchOutcome::NoSummaries)
        } else {
            let answer = self
                .generate_answer(scope, query, &summaries)
                .await
                .map_err(StageError::answer)?;
            (answer, SearchOutcome::Answered)
        };

        info!(target: "ticket_agent::pipeline", request = %scope.token(), summaries = summaries.len(), "search completed");
        Ok(SearchResult {
            query: query.to_string(),
            ticket_summaries: summaries,
            answer,
            outcome,
        })
    }

    /// Embeds the query and returns the `limit` nearest fragments.
    pub async fn vector_search(&self, query: &str, limit: u64) -> Result<Vec<RagHit>, AgentError> {
        Ok(search_by_text(self.store.as_ref(), self.embedder.as_ref(), query, limit).await?)
    }

    /// Scans all fragments of each ticket. Failing or empty tickets are skipped.
    pub async fn fetch_complete_tickets(&self, ticket_ids: &[TicketId]) -> Vec<TicketFragments> {
        let mut out = Vec::with_capacity(ticket_ids.len());

        for id in ticket_ids {
            let filter = RagFilter::equals(TICKET_ID_FIELD, id.to_json());
            match scroll_all(self.store.as_ref(), &filter, self.page_size).await {
                // Skipped, not summarized from empty text with empty metadata.
                Ok(fragments) if fragments.is_empty() => {
                    warn!(target: "ticket_agent::pipeline", ticket_id = %id, "ticket has no fragments; skipped");
                }
                Ok(fragments) => {
                    debug!(target: "ticket_agent::pipeline", ticket_id = %id, fragments = fragments.len(), "ticket fetched");
                    out.push(TicketFragments {
                        ticket_id: id.clone(),
                        fragments,
                    });
                }
                Err(e) => {
                    warn!(target: "ticket_agent::pipeline", ticket_id = %id, error = %e, "fetching ticket failed; skipped");
                }
            }
        }

        out
    }

    /// One summary per ticket, each in a fresh session of `scope`.
    ///
    /// Agent failures skip the ticket; blank replies get a placeholder.
    pub async fn summarize_tickets(
        &self,
        scope: &mut RequestScope,
        tickets: &[TicketFragments],
    ) -> Vec<TicketSummary> {
        let mut out = Vec::with_capacity(tickets.len());

        for t in tickets {
            let full_text = join_fragment_text(&t.fragments);
            let message = prompt::summary_prompt(&full_text);

            let reply = match scope
                .open(SUMMARIZER_USER, "summarize", &session_key(&t.ticket_id))
                .await
            {
                Ok(session) => self.runner.run(&session, &message).await,
                Err(e) => Err(e),
            };

            let summary = match reply {
                Ok(Some(s)) => s,
                Ok(None) => NO_SUMMARY_PLACEHOLDER.to_string(),
                Err(e) => {
                    warn!(target: "ticket_agent::pipeline", ticket_id = %t.ticket_id, error = %e, "summarization failed; skipped");
                    continue;
                }
            };

            out.push(TicketSummary {
                ticket_id: t.ticket_id.clone(),
                summary,
                metadata: first_fragment_metadata(&t.fragments),
            });
        }

        out
    }

    /// Synthesizes the final answer from all summaries.
    pub async fn generate_answer(
        &self,
        scope: &mut RequestScope,
        query: &str,
        summaries: &[TicketSummary],
    ) -> Result<String, AgentError> {
        if summaries.is_empty() {
            return Ok(NO_SUMMARIES.to_string());
        }

        let message = prompt::answer_prompt(query, summaries);
        let session = scope
            .open(ASKER_USER, "answer", &query_digest(query).to_string())
            .await?;

        Ok(self
            .runner
            .run(&session, &message)
            .await?
            .unwrap_or_else(|| NO_ANSWER_PLACEHOLDER.to_string()))
    }
}

/// Distinct ticket ids in first-seen order; hits without a usable id are ignored.
pub fn extract_ticket_ids(hits: &[RagHit]) -> Vec<TicketId> {
    let mut seen = HashSet::new();
    hits.iter()
        .filter_map(|h| h.payload.get(TICKET_ID_FIELD).and_then(TicketId::from_payload))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Session key of a ticket; keeps `17` and `"17"` apart.
fn session_key(id: &TicketId) -> String {
    id.to_json().to_string()
}

fn join_fragment_text(fragments: &[RagPoint]) -> String {
    fragments
        .iter()
        .map(|f| {
            f.payload
                .get(TEXT_FIELD)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(prompt::FRAGMENT_JOINER)
}

/// Payload of the first fragment minus `text` and `vector`.
///
/// Fields that differ between fragments of the same ticket are taken from
/// the first one only.
fn first_fragment_metadata(fragments: &[RagPoint]) -> Payload {
    fragments
        .first()
        .map(|f| {
            f.payload
                .iter()
                .filter(|(k, _)| k.as_str() != TEXT_FIELD && k.as_str() != VECTOR_FIELD)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_store::PointKey;
    use serde_json::json;

    fn hit(payload: serde_json::Value) -> RagHit {
        RagHit {
            id: None,
            score: 0.5,
            payload: payload.as_object().cloned().unwrap_or_default(),
        }
    }

    fn point(i: u64, payload: serde_json::Value) -> RagPoint {
        RagPoint {
            id: Some(PointKey::Num(i)),
            payload: payload.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn ids_are_deduplicated_in_first_seen_order() {
        let hits = [
            hit(json!({"ticket_id": "T2"})),
            hit(json!({"ticket_id": "T1"})),
            hit(json!({"ticket_id": "T2"})),
            hit(json!({"text": "orphan"})),
            hit(json!({"ticket_id": null})),
            hit(json!({"ticket_id": 17})),
        ];
        assert_eq!(
            extract_ticket_ids(&hits),
            vec![
                TicketId::Text("T2".into()),
                TicketId::Text("T1".into()),
                TicketId::Int(17)
            ]
        );
    }

    #[test]
    fn string_and_integer_ids_stay_distinct() {
        let hits = [hit(json!({"ticket_id": "17"})), hit(json!({"ticket_id": 17}))];
        let ids = extract_ticket_ids(&hits);
        assert_eq!(ids.len(), 2);
        assert_ne!(session_key(&ids[0]), session_key(&ids[1]));
    }

    #[test]
    fn fragments_join_with_single_space() {
        let f = [
            point(1, json!({"text": "Customer asked"})),
            point(2, json!({"author": "bot"})),
            point(3, json!({"text": "for a refund."})),
        ];
        assert_eq!(join_fragment_text(&f), "Customer asked  for a refund.");
    }

    #[test]
    fn metadata_excludes_text_and_vector() {
        let f = [
            point(
                1,
                json!({"ticket_id": "T1", "text": "a", "vector": [0.1], "status": "open"}),
            ),
            point(2, json!({"ticket_id": "T1", "text": "b", "status": "closed"})),
        ];
        let m = first_fragment_metadata(&f);
        assert_eq!(m.get("status"), Some(&json!("open")));
        assert_eq!(m.get("ticket_id"), Some(&json!("T1")));
        assert!(!m.contains_key("text"));
        assert!(!m.contains_key("vector"));
        assert!(first_fragment_metadata(&[]).is_empty());
    }
}
