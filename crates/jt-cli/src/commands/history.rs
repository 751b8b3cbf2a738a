//! Recent work logs.

use std::io::Write;

use anyhow::{Context, Result};

use jt_core::WorkLogEntry;
use jt_jira::{JiraClient, Transport};

use super::util::{explain, format_duration};

pub async fn run<W: Write, T: Transport>(
    writer: &mut W,
    client: &JiraClient<T>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let entries = client
        .fetch_recent_work_logs(limit)
        .await
        .map_err(explain)
        .context("failed to load work log history")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
    } else {
        write!(writer, "{}", render(&entries))?;
    }
    Ok(())
}

pub fn render(entries: &[WorkLogEntry]) -> String {
    if entries.is_empty() {
        return "No work logged in the last 30 days.\n".to_string();
    }

    let key_width = entries
        .iter()
        .map(|entry| entry.issue_key.as_str().len())
        .max()
        .unwrap_or(0);
    let rows: Vec<(String, String)> = entries
        .iter()
        .map(|entry| {
            (
                entry.started.format("%Y-%m-%d %H:%M").to_string(),
                format_duration(entry.time_spent_seconds),
            )
        })
        .collect();
    let time_width = rows.iter().map(|(_, time)| time.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (entry, (started, time)) in entries.iter().zip(rows) {
        let mut line = format!(
            "{started}  {:key_width$}  {time:>time_width$}  {}",
            entry.issue_key.as_str(),
            entry.issue_summary
        );
        if !entry.comment.is_empty() {
            line.push_str(&format!(" ({})", entry.comment));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
