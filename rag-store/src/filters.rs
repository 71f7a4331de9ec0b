//! Filter conversion to Qdrant `Filter`.
//!
//! Supports exact equality on scalar fields (`String`, integer `Number`, `Bool`).

use crate::errors::RagError;
use crate::record::RagFilter;
use qdrant_client::qdrant::{
    Condition, FieldCondition, Filter, Match, condition::ConditionOneOf, r#match::MatchValue,
};
use tracing::debug;

/// Converts [`RagFilter`] to a Qdrant [`Filter`] whose conditions all must hold.
///
/// - `String` → `Keyword`
/// - integer `Number` → `Integer`
/// - `Bool`   → `Boolean`
///
/// # Errors
/// Floats, nulls and structured values are rejected with `RagError::Config`.
/// A condition is never dropped from the resulting filter.
pub fn to_qdrant_filter(f: &RagFilter) -> Result<Filter, RagError> {
    debug!(target: "rag_store::filters", conditions = f.must_equal.len(), "to_qdrant_filter");

    let mut must: Vec<Condition> = Vec::with_capacity(f.must_equal.len());

    for (field, val) in &f.must_equal {
        let match_value = match val {
            serde_json::Value::String(s) => MatchValue::Keyword(s.clone()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => MatchValue::Integer(i),
                None => {
                    return Err(RagError::Config(format!(
                        "filter on `{field}`: non-integer number {n} is not matchable"
                    )));
                }
            },
            serde_json::Value::Bool(b) => MatchValue::Boolean(*b),
            other => {
                return Err(RagError::Config(format!(
                    "filter on `{field}`: unsupported value {other}"
                )));
            }
        };

        must.push(Condition {
            condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
                key: field.clone(),
                r#match: Some(Match {
                    match_value: Some(match_value),
                }),
                ..Default::default()
            })),
        });
    }

    Ok(Filter {
        must,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_match(c: &Condition) -> (&str, &MatchValue) {
        match &c.condition_one_of {
            Some(ConditionOneOf::Field(fc)) => (
                fc.key.as_str(),
                fc.r#match
                    .as_ref()
                    .and_then(|m| m.match_value.as_ref())
                    .unwrap(),
            ),
            other => panic!("unexpected condition: {other:?}"),
        }
    }

    #[test]
    fn string_id_becomes_keyword_must() {
        let f = to_qdrant_filter(&RagFilter::equals("ticket_id", "T1")).unwrap();
        assert!(f.should.is_empty());
        assert_eq!(f.must.len(), 1);
        let (key, mv) = field_match(&f.must[0]);
        assert_eq!(key, "ticket_id");
        assert_eq!(mv, &MatchValue::Keyword("T1".into()));
    }

    #[test]
    fn integer_and_bool_are_typed() {
        let f = to_qdrant_filter(
            &RagFilter::equals("ticket_id", json!(4211)).and_equals("public", true),
        )
        .unwrap();
        assert_eq!(f.must.len(), 2);
        assert_eq!(field_match(&f.must[0]).1, &MatchValue::Integer(4211));
        assert_eq!(field_match(&f.must[1]).1, &MatchValue::Boolean(true));
    }

    #[test]
    fn unsupported_values_are_rejected() {
        assert!(to_qdrant_filter(&RagFilter::equals("ticket_id", json!(1.5))).is_err());
        assert!(to_qdrant_filter(&RagFilter::equals("ticket_id", json!(null))).is_err());
        assert!(to_qdrant_filter(&RagFilter::equals("ticket_id", json!(["a"]))).is_err());
    }
}
