//! Public API types re-used by the HTTP and tool front ends.

use std::fmt;

use rag_store::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Stage;

/// Ticket identifier as stored in the `ticket_id` payload field.
///
/// Kept typed so the exact-match scan uses the same JSON type the
/// fragments were indexed with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketId {
    Int(i64),
    Text(String),
}

impl TicketId {
    /// Reads a usable id from a payload value.
    ///
    /// Null, bool, float and structured values yield `None`.
    pub fn from_payload(v: &Value) -> Option<Self> {
        match v {
            Value::String(s) => Some(TicketId::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(TicketId::Int),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            TicketId::Int(i) => Value::from(*i),
            TicketId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketId::Int(i) => write!(f, "{i}"),
            TicketId::Text(s) => f.write_str(s),
        }
    }
}

/// Generated summary of one ticket plus metadata from its first fragment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TicketSummary {
    pub ticket_id: TicketId,
    pub summary: String,
    pub metadata: Payload,
}

/// How a request ended. Not part of the wire format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Answered,
    NoRelevantTickets,
    NoSummaries,
    Failed { stage: Stage, message: String },
}

/// Response of one pipeline run.
#[derive(Clone, Debug, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub ticket_summaries: Vec<TicketSummary>,
    pub answer: String,
    #[serde(skip)]
    pub outcome: SearchOutcome,
}

impl SearchResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Failed { .. })
    }
}

/// Static identity of the agent, exposed by both front ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub agent_name: String,
    pub description: String,
    pub model: String,
    pub collection: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ticket_id_accepts_strings_and_integers_only() {
        assert_eq!(
            TicketId::from_payload(&json!("T1")),
            Some(TicketId::Text("T1".into()))
        );
        assert_eq!(TicketId::from_payload(&json!(42)), Some(TicketId::Int(42)));
        assert_eq!(TicketId::from_payload(&json!(4.2)), None);
        assert_eq!(TicketId::from_payload(&json!(null)), None);
        assert_eq!(TicketId::from_payload(&json!({"id": 1})), None);
    }

    #[test]
    fn result_serializes_without_outcome_and_keeps_id_type() {
        let r = SearchResult {
            query: "q".into(),
            ticket_summaries: vec![TicketSummary {
                ticket_id: TicketId::Int(7),
                summary: "s".into(),
                metadata: Payload::new(),
            }],
            answer: "a".into(),
            outcome: SearchOutcome::Answered,
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            json!({
                "query": "q",
                "ticket_summaries": [{"ticket_id": 7, "summary": "s", "metadata": {}}],
                "answer": "a"
            })
        );
    }
}
