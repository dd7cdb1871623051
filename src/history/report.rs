use anyhow::Result;
use chrono::{Local, TimeZone};
use std::io::Write;

use crate::history::model::ActivityEdge;

fn format_timestamp(epoch_ms: Option<i64>) -> String {
    epoch_ms
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map(|t| t.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}

fn render_activity(index: usize, edge: &ActivityEdge) -> String {
    let Some(node) = edge.node.as_ref() else {
        return format!("\n--- Activity #{} ---\n(missing node)\n", index + 1);
    };

    format!(
        "\n--- Activity #{} ---\nType: {}\nTime: {}\nAuthor: {}\nDescription: {}\n",
        index + 1,
        node.activity_type().unwrap_or("unknown"),
        format_timestamp(node.timestamp_millis()),
        node.author_name().unwrap_or("unknown"),
        node.description,
    )
}

pub fn print_activities<W: Write>(out: &mut W, edges: &[ActivityEdge]) -> Result<()> {
    for (idx, edge) in edges.iter().enumerate() {
        out.write_all(render_activity(idx, edge).as_bytes())?;
    }
    Ok(())
}
