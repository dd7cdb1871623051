pub mod config;
pub mod description;
pub mod export;
pub mod filter;
pub mod model;
pub mod paginate;
pub mod report;

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::graphql::client::ActivitySource;
use crate::history::config::QueryConfig;
use crate::history::export::{ActivityExport, write_export};
use crate::history::filter::filter_by_field;
use crate::history::paginate::{PageSummary, fetch_all_pages};
use crate::history::report::print_activities;

#[derive(Debug, Clone)]
pub struct HistoryRequest<'a> {
    pub field_filter: Option<&'a str>,
    pub asset_id: Option<&'a str>,
    pub output_path: &'a Path,
}

#[derive(Debug, Clone)]
pub struct HistoryRun {
    pub export: ActivityExport,
    pub summary: PageSummary,
    pub output_path: PathBuf,
}

/// Fetch every page, filter, print the survivors to `out` and persist them.
/// Nothing is written when any page fails.
pub fn fetch_history<S, W>(
    source: &S,
    query: &QueryConfig,
    request: &HistoryRequest<'_>,
    out: &mut W,
) -> Result<HistoryRun>
where
    S: ActivitySource + ?Sized,
    W: Write,
{
    let fetched = fetch_all_pages(source, query, request.asset_id)?;
    let kept = filter_by_field(fetched.edges, request.field_filter);
    info!(
        pages = fetched.summary.pages,
        records = fetched.summary.records,
        kept = kept.len(),
        "activity history fetched"
    );

    print_activities(out, &kept)?;

    let export = ActivityExport::new(kept);
    let output_path = write_export(request.output_path, &export)?;
    writeln!(
        out,
        "Saved all filtered results to {}",
        output_path.display()
    )?;

    Ok(HistoryRun {
        export,
        summary: fetched.summary,
        output_path,
    })
}
