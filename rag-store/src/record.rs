//! Core data models used by the library.

use qdrant_client::qdrant::{PointId, point_id::PointIdOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON object stored next to a vector.
pub type Payload = Map<String, Value>;

/// Point identifier as Qdrant stores it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointKey {
    Num(u64),
    Uuid(String),
}

impl PointKey {
    pub(crate) fn from_qdrant(id: Option<PointId>) -> Option<Self> {
        match id?.point_id_options? {
            PointIdOptions::Num(n) => Some(PointKey::Num(n)),
            PointIdOptions::Uuid(u) => Some(PointKey::Uuid(u)),
        }
    }
}

impl From<PointKey> for PointId {
    fn from(k: PointKey) -> Self {
        match k {
            PointKey::Num(n) => PointId::from(n),
            PointKey::Uuid(u) => PointId::from(u),
        }
    }
}

/// A single similarity hit.
#[derive(Clone, Debug)]
pub struct RagHit {
    pub id: Option<PointKey>,
    pub score: f32,
    pub payload: Payload,
}

/// A stored point returned by a filtered scan.
#[derive(Clone, Debug)]
pub struct RagPoint {
    pub id: Option<PointKey>,
    pub payload: Payload,
}

/// One page of a filtered scan plus the cursor for the next one.
#[derive(Clone, Debug, Default)]
pub struct ScrollPage {
    pub points: Vec<RagPoint>,
    pub next_offset: Option<PointKey>,
}

/// Conjunction of exact-match conditions on payload fields.
#[derive(Clone, Debug, Default)]
pub struct RagFilter {
    /// Every pair must match, e.g. `("ticket_id", "T1")`.
    pub must_equal: Vec<(String, Value)>,
}

impl RagFilter {
    /// Filter with a single exact-match condition.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            must_equal: vec![(field.into(), value.into())],
        }
    }

    /// Adds another exact-match condition.
    pub fn and_equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.must_equal.push((field.into(), value.into()));
        self
    }
}
