use serde::Deserialize;

/// Query string of `GET /query`.
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Natural language search term.
    pub search_term: String,
}
