use anyhow::Result;
use std::io;
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::graphql::client::GraphQlClient;
use crate::graphql::query::HistoryVariables;
use crate::history::config::load_config;
use crate::history::{HistoryRequest, fetch_history};

pub const DEFAULT_FIELD_FILTER: &str = "Last run date";

#[derive(Debug, Clone)]
pub struct FetchHistoryOptions {
    pub field_filter: Option<String>,
    pub asset_id: Option<String>,
    pub output_path: Option<PathBuf>,
    pub dry_run: bool,
    /// Print the activity listing to stdout. Off when stdout carries the
    /// JSON report.
    pub print_listing: bool,
}

pub fn run(opts: &FetchHistoryOptions) -> Result<CommandReport> {
    let cfg = load_config()?;
    let mut report = CommandReport::new("fetch-history");

    let field_filter = opts.field_filter.as_deref().filter(|f| !f.is_empty());
    let asset_id = opts
        .asset_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let output_path = opts
        .output_path
        .clone()
        .unwrap_or_else(|| cfg.output.path.clone());

    report.detail(format!("endpoint={}", cfg.endpoint.url));
    report.detail(format!("field_filter={}", field_filter.unwrap_or("<none>")));
    report.detail(format!("asset_id={}", asset_id.unwrap_or("<none>")));

    if opts.dry_run {
        let first_page = HistoryVariables::page(
            cfg.query.batch_size,
            0,
            cfg.query.start_date_ms,
            asset_id,
        );
        report.detail("dry_run=true".to_string());
        report.detail(format!("username={}", cfg.endpoint.username));
        report.detail("password=<redacted>".to_string());
        report.detail(format!("batch_size={}", cfg.query.batch_size));
        report.detail(format!("max_pages={}", cfg.query.max_pages));
        report.detail(format!(
            "first_page_variables={}",
            serde_json::to_string(&first_page)?
        ));
        report.detail(format!("output_path={}", output_path.display()));
        return Ok(report);
    }

    let client = GraphQlClient::new(&cfg.endpoint)?;
    let request = HistoryRequest {
        field_filter,
        asset_id,
        output_path: &output_path,
    };
    let run = if opts.print_listing {
        fetch_history(&client, &cfg.query, &request, &mut io::stdout().lock())?
    } else {
        fetch_history(&client, &cfg.query, &request, &mut io::sink())?
    };

    report.detail(format!("pages={}", run.summary.pages));
    report.detail(format!("fetched={}", run.summary.records));
    report.detail(format!("kept={}", run.export.edges().len()));
    report.detail(format!("truncated={}", run.summary.truncated));
    report.detail(format!("output_path={}", run.output_path.display()));

    Ok(report)
}
