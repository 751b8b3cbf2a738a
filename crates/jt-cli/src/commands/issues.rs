//! Lists issues through the default query cascade.

use std::io::Write;

use anyhow::Result;
use serde_json::json;

use jt_core::{Issue, User};
use jt_jira::{JiraClient, QueryPlan, SearchOutcome, Transport, run_plan};

use super::util::explain;

const SUMMARY_WIDTH: usize = 60;
const COMMENT_WIDTH: usize = 70;

pub async fn run<W: Write, T: Transport>(
    writer: &mut W,
    client: &JiraClient<T>,
    jql: Option<&str>,
    preferred: Option<&str>,
    json: bool,
) -> Result<()> {
    let plan = QueryPlan::for_request(jql, preferred);
    let outcome = match run_plan(client, &plan).await {
        Ok(outcome) => outcome,
        Err(err) => {
            return Err(explain(err.source).context(format!("query failed: {}", err.query)));
        }
    };

    let me = if outcome.issues.iter().any(|issue| issue.latest_comment().is_some()) {
        signed_in_user(client).await
    } else {
        None
    };

    if json {
        let issues: Vec<_> = outcome
            .issues
            .iter()
            .map(|issue| issue_json(issue, me.as_ref()))
            .collect::<Result<_, _>>()?;
        let value = json!({ "query": outcome.query, "issues": issues });
        writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        write!(writer, "{}", render(&outcome, me.as_ref()))?;
    }
    Ok(())
}

/// The user to compare comment authors against. Only decoration depends on
/// it, so a failed lookup leaves comments unmarked.
async fn signed_in_user<T: Transport>(client: &JiraClient<T>) -> Option<User> {
    if let Some(user) = client.cached_user() {
        return Some(user);
    }
    match client.current_user().await {
        Ok(user) => Some(user),
        Err(error) => {
            tracing::debug!(%error, "could not look up signed-in user");
            None
        }
    }
}

fn issue_json(issue: &Issue, me: Option<&User>) -> serde_json::Result<serde_json::Value> {
    let mut value = serde_json::to_value(issue)?;
    if let (Some(comment), Some(me), Some(object)) =
        (issue.latest_comment(), me, value.as_object_mut())
    {
        object.insert("latest_comment_is_mine".to_string(), comment.is_by(me).into());
    }
    Ok(value)
}

/// Plain-text listing: the query, then one issue per line, each followed by
/// its latest comment if it has one.
pub fn render(outcome: &SearchOutcome, me: Option<&User>) -> String {
    let mut out = format!("Query: {}\n", outcome.query);
    if outcome.issues.is_empty() {
        out.push_str("No issues found.\n");
        return out;
    }

    let key_width = outcome
        .issues
        .iter()
        .map(|issue| issue.key.as_str().len())
        .max()
        .unwrap_or(0);
    let status_width = outcome
        .issues
        .iter()
        .map(|issue| issue.status.chars().count())
        .max()
        .unwrap_or(0);

    for issue in &outcome.issues {
        out.push_str(&format!(
            "{:key_width$}  {:status_width$}  {}\n",
            issue.key.as_str(),
            issue.status,
            summary_line(issue)
        ));
        if let Some(comment) = issue.latest_comment() {
            let mine = me.is_some_and(|me| comment.is_by(me));
            let author = if comment.author.display_name.is_empty() {
                "unknown"
            } else {
                comment.author.display_name.as_str()
            };
            out.push_str(&format!(
                "{:key_width$}  {author}{}: {}\n",
                "",
                if mine { " (you)" } else { "" },
                truncate(&comment.body.replace('\n', " "), COMMENT_WIDTH)
            ));
        }
    }
    out
}

fn summary_line(issue: &Issue) -> String {
    let summary = truncate(&issue.summary, SUMMARY_WIDTH);
    match &issue.assignee {
        Some(assignee) => format!("{summary} [{assignee}]"),
        None => summary,
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
