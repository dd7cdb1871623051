use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::commands::fetch_history::{self, DEFAULT_FIELD_FILTER, FetchHistoryOptions};

#[derive(Debug, Parser)]
#[command(
    name = "activity-history",
    version,
    about = "Fetch activity history from a GraphQL endpoint and export it as JSON"
)]
struct Cli {
    /// Keep only activities whose decoded description has this `field` value.
    /// An empty value means the default; use `--all` to disable filtering
    #[arg(default_value = DEFAULT_FIELD_FILTER)]
    field: String,

    /// Keep every activity regardless of its description field
    #[arg(long)]
    all: bool,

    /// Asset id sent as the query's context id
    #[arg(long)]
    asset_id: Option<String>,

    /// Export path (defaults to the configured output path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Resolve configuration and show the first request without fetching
    #[arg(long)]
    dry_run: bool,

    /// Print the command report as JSON on stdout instead of the listing
    #[arg(long)]
    json: bool,
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        eprint!("{}", report.render_text());
    }
    Ok(())
}

fn field_filter(field: String, all: bool) -> Option<String> {
    if all {
        None
    } else if field.trim().is_empty() {
        Some(DEFAULT_FIELD_FILTER.to_string())
    } else {
        Some(field)
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let opts = FetchHistoryOptions {
        field_filter: field_filter(cli.field, cli.all),
        asset_id: cli.asset_id,
        output_path: cli.output,
        dry_run: cli.dry_run,
        print_listing: !cli.json,
    };

    let report = fetch_history::run(&opts)?;
    print_report(&report, cli.json)
}
