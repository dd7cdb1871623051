use tracing::{debug, error, warn};

use crate::error::HistoryError;
use crate::graphql::client::ActivitySource;
use crate::graphql::query::HistoryVariables;
use crate::history::config::QueryConfig;
use crate::history::model::ActivityEdge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub pages: u32,
    pub records: usize,
    /// Page ceiling was hit while the last page was still full.
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct FetchedHistory {
    pub edges: Vec<ActivityEdge>,
    pub summary: PageSummary,
}

fn log_fetch_failure(err: &HistoryError, offset: u64) {
    match err.response() {
        Some((status, body)) => error!(offset, status, body, "graphql response error"),
        None => error!(offset, message = %err, "graphql request error"),
    }
}

/// Page through the history query, one request at a time, until a short page
/// or `max_pages`. Any failed page aborts the whole fetch.
pub fn fetch_all_pages<S: ActivitySource + ?Sized>(
    source: &S,
    query: &QueryConfig,
    context_id: Option<&str>,
) -> Result<FetchedHistory, HistoryError> {
    let batch = query.batch_size as usize;
    let mut edges: Vec<ActivityEdge> = Vec::new();
    let mut offset: u64 = 0;
    let mut pages: u32 = 0;
    let mut keep_fetching = true;

    while keep_fetching && pages < query.max_pages {
        let variables =
            HistoryVariables::page(query.batch_size, offset, query.start_date_ms, context_id);
        let page = source.fetch_page(&variables).inspect_err(|err| {
            log_fetch_failure(err, offset);
        })?;

        let count = page.len();
        debug!(offset, count, "fetched history page");
        edges.extend(page.into_iter().map(ActivityEdge::from));

        if count < batch {
            keep_fetching = false;
        } else {
            offset += u64::from(query.batch_size);
        }
        pages += 1;
    }

    let truncated = keep_fetching;
    if truncated {
        warn!(
            pages,
            records = edges.len(),
            "page ceiling reached; older activity was not fetched"
        );
    }

    Ok(FetchedHistory {
        summary: PageSummary {
            pages,
            records: edges.len(),
            truncated,
        },
        edges,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::fetch_all_pages;
    use crate::error::HistoryError;
    use crate::graphql::client::ActivitySource;
    use crate::graphql::query::HistoryVariables;
    use crate::history::config::QueryConfig;
    use crate::history::model::{Lenient, RawActivityEdge, RawActivityNode};
    use serde_json::Value;
    use std::cell::RefCell;

    pub(crate) fn raw_edge(id: &str, description: Option<&str>) -> RawActivityEdge {
        RawActivityEdge {
            node: Some(RawActivityNode {
                id: Some(Lenient::Typed(id.to_string())),
                description: description.map(|d| Value::String(d.to_string())),
                timestamp: Some(Lenient::Typed(1_740_787_200_000)),
                activity_type: Some(Lenient::Typed("UPDATE".to_string())),
                ..Default::default()
            }),
        }
    }

    /// Serves page sizes from a script, or a fixed size forever.
    pub(crate) struct ScriptedSource {
        sizes: Vec<usize>,
        repeat_last: bool,
        fail_on_call: Option<usize>,
        pub(crate) seen: RefCell<Vec<HistoryVariables>>,
    }

    impl ScriptedSource {
        pub(crate) fn pages(sizes: &[usize]) -> Self {
            Self {
                sizes: sizes.to_vec(),
                repeat_last: false,
                fail_on_call: None,
                seen: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn always(size: usize) -> Self {
            Self {
                sizes: vec![size],
                repeat_last: true,
                fail_on_call: None,
                seen: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn failing_on(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }
    }

    impl ActivitySource for ScriptedSource {
        fn fetch_page(
            &self,
            variables: &HistoryVariables,
        ) -> Result<Vec<RawActivityEdge>, HistoryError> {
            let call = self.seen.borrow().len();
            self.seen.borrow_mut().push(variables.clone());
            if self.fail_on_call == Some(call) {
                return Err(HistoryError::Transport {
                    message: "connection reset by peer".to_string(),
                });
            }
            let size = match self.sizes.get(call) {
                Some(size) => *size,
                None if self.repeat_last => self.sizes.last().copied().unwrap_or(0),
                None => 0,
            };
            Ok((0..size)
                .map(|i| raw_edge(&format!("{}-{i}", variables.offset), Some("{\"field\":\"x\"}")))
                .collect())
        }
    }

    #[test]
    fn always_full_pages_stop_at_the_page_ceiling() {
        let source = ScriptedSource::always(100);
        let fetched = fetch_all_pages(&source, &QueryConfig::default(), None).expect("fetch");

        assert_eq!(fetched.summary.pages, 100);
        assert_eq!(fetched.edges.len(), 10_000);
        assert_eq!(fetched.summary.records, 10_000);
        assert!(fetched.summary.truncated);
        assert_eq!(source.seen.borrow().len(), 100);
    }

    #[test]
    fn short_page_ends_pagination() {
        let source = ScriptedSource::pages(&[100, 100, 37]);
        let fetched = fetch_all_pages(&source, &QueryConfig::default(), None).expect("fetch");

        assert_eq!(fetched.edges.len(), 237);
        assert_eq!(fetched.summary.pages, 3);
        assert!(!fetched.summary.truncated);

        let offsets: Vec<u64> = source.seen.borrow().iter().map(|v| v.offset).collect();
        assert_eq!(offsets, vec![0, 100, 200]);
    }

    #[test]
    fn exactly_full_last_page_needs_one_more_empty_request() {
        let source = ScriptedSource::pages(&[100, 0]);
        let fetched = fetch_all_pages(&source, &QueryConfig::default(), None).expect("fetch");
        assert_eq!(fetched.edges.len(), 100);
        assert_eq!(fetched.summary.pages, 2);
        assert!(!fetched.summary.truncated);
    }

    #[test]
    fn page_order_is_preserved_and_descriptions_decoded() {
        let source = ScriptedSource::pages(&[100, 5]);
        let fetched = fetch_all_pages(&source, &QueryConfig::default(), None).expect("fetch");

        let ids: Vec<&str> = fetched
            .edges
            .iter()
            .filter_map(|e| e.node.as_ref()?.id.as_ref()?.typed().map(String::as_str))
            .collect();
        assert_eq!(ids.first(), Some(&"0-0"));
        assert_eq!(ids[99], "0-99");
        assert_eq!(ids[100], "100-0");
        assert_eq!(ids.last(), Some(&"100-4"));
        let node = fetched.edges[0].node.as_ref().expect("node");
        assert_eq!(node.description_field(), Some("x"));
    }

    #[test]
    fn every_request_carries_bounds_and_context() {
        let query = QueryConfig {
            start_date_ms: 42,
            batch_size: 10,
            max_pages: 5,
        };
        let source = ScriptedSource::pages(&[10, 3]);
        fetch_all_pages(&source, &query, Some("asset-1")).expect("fetch");

        for vars in source.seen.borrow().iter() {
            assert_eq!(vars.count, 10);
            assert_eq!(vars.start_date, 42);
            assert_eq!(vars.id.as_deref(), Some("asset-1"));
            assert!(vars.end_date.is_none());
            assert!(vars.categories.is_none());
        }
    }

    #[test]
    fn failure_on_second_page_returns_no_records() {
        let source = ScriptedSource::always(100).failing_on(1);
        let err = fetch_all_pages(&source, &QueryConfig::default(), None)
            .expect_err("second page should fail");

        assert!(matches!(err, HistoryError::Transport { .. }));
        assert_eq!(source.seen.borrow().len(), 2);
    }
}
