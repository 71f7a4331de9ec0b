//! In-memory doubles shared by the front-end tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rag_store::{
    BoxFuture, EmbeddingsProvider, PointKey, RagError, RagFilter, RagHit, RagPoint, ScrollPage,
    VectorStore,
};
use serde_json::{Value, json};
use ticket_agent::{AgentConfig, AgentError, LanguageModel, TicketSearchAgent};

pub const ANSWER: &str = "Refunds are processed within 5 days.";

/// Two tickets, each made of two fragments.
#[derive(Default)]
pub struct TicketStore {
    pub search_error: Option<String>,
    pub top_k_seen: Mutex<Vec<u64>>,
}

fn fragment(ticket: &str, text: &str) -> RagPoint {
    RagPoint {
        id: None,
        payload: json!({ "ticket_id": ticket, "text": text, "subject": "Refund" })
            .as_object()
            .cloned()
            .unwrap_or_default(),
    }
}

impl VectorStore for TicketStore {
    fn search<'a>(
        &'a self,
        _vector: Vec<f32>,
        top_k: u64,
        _filter: Option<&'a RagFilter>,
    ) -> BoxFuture<'a, Result<Vec<RagHit>, RagError>> {
        Box::pin(async move {
            self.top_k_seen.lock().unwrap().push(top_k);
            if let Some(msg) = &self.search_error {
                return Err(RagError::Qdrant(msg.clone()));
            }
            let hits = ["T1", "T2", "T1"]
                .iter()
                .map(|id| RagHit {
                    id: None,
                    score: 0.8,
                    payload: json!({ "ticket_id": id }).as_object().cloned().unwrap_or_default(),
                })
                .take(top_k as usize)
                .collect();
            Ok(hits)
        })
    }

    fn scroll<'a>(
        &'a self,
        filter: &'a RagFilter,
        _limit: u32,
        _offset: Option<PointKey>,
    ) -> BoxFuture<'a, Result<ScrollPage, RagError>> {
        Box::pin(async move {
            let id = match &filter.must_equal[0].1 {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Ok(ScrollPage {
                points: vec![
                    fragment(&id, &format!("{id} customer asked for a refund")),
                    fragment(&id, "agent approved it"),
                ],
                next_offset: None,
            })
        })
    }
}

pub struct FixedEmbedder;

impl EmbeddingsProvider for FixedEmbedder {
    fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        Box::pin(async { Ok(vec![0.5; 4]) })
    }
}

/// Summarizes by echoing, answers with [`ANSWER`], or panics when asked to.
pub struct ScriptedModel {
    pub panic_on_answer: bool,
}

impl LanguageModel for ScriptedModel {
    fn model_id(&self) -> &str {
        "stub-model"
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        _system: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, AgentError>> {
        let summary = prompt.starts_with("Summarize the following support ticket concisely: ");
        if !summary && self.panic_on_answer {
            panic!("model crashed");
        }
        let out = if summary {
            "Customer got a refund.".to_string()
        } else {
            ANSWER.to_string()
        };
        Box::pin(async move { Ok(out) })
    }
}

pub fn agent_with(store: Arc<TicketStore>, model: ScriptedModel) -> Arc<TicketSearchAgent> {
    let cfg = AgentConfig::with_url("http://localhost:6334");
    Arc::new(TicketSearchAgent::new(
        store,
        Arc::new(FixedEmbedder),
        Arc::new(model),
        &cfg,
    ))
}

pub fn agent() -> Arc<TicketSearchAgent> {
    agent_with(
        Arc::new(TicketStore::default()),
        ScriptedModel {
            panic_on_answer: false,
        },
    )
}
