use serde_json::Value;

use crate::history::model::RawActivityEdge;

/// A decoded GraphQL response body. Levels of the envelope are read with
/// optional lookups so a level of the wrong shape reads as absent.
#[derive(Debug, Default)]
pub struct HistoryResponse {
    body: Value,
}

impl HistoryResponse {
    /// Fails only when `raw` is not JSON.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            body: serde_json::from_str(raw)?,
        })
    }

    pub fn has_errors(&self) -> bool {
        self.body
            .get("errors")
            .and_then(Value::as_array)
            .is_some_and(|errs| !errs.is_empty())
    }

    /// Edges of the page; any missing or non-conforming level of nesting is an
    /// empty page.
    pub fn into_edges(self) -> Vec<RawActivityEdge> {
        self.body
            .get("data")
            .and_then(|d| d.get("api"))
            .and_then(|a| a.get("activities"))
            .and_then(|a| a.get("edges"))
            .and_then(Value::as_array)
            .map(|edges| edges.iter().map(RawActivityEdge::from_wire).collect())
            .unwrap_or_default()
    }
}
