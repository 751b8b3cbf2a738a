//! Work-log submission.
//!
//! Both `jt log` and a finished `jt track` end up in [`submit`]. If the
//! server does not take the work log, the tracked time is printed together
//! with a `jt log` command that resubmits it unchanged.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use jt_core::{IssueKey, TimeLogResult};
use jt_jira::{JiraClient, Transport};

use super::util::{explain, format_duration, parse_datetime, parse_duration};

/// One work log, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub issue: IssueKey,
    pub seconds: u64,
    pub started: DateTime<Utc>,
    pub message: Option<String>,
    /// Also post the message as a comment.
    pub comment: bool,
}

impl Submission {
    pub fn from_timer(result: &TimeLogResult, message: Option<String>, comment: bool) -> Self {
        Self {
            issue: result.issue.key.clone(),
            seconds: result.duration_seconds(),
            started: result.started_at,
            message,
            comment,
        }
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }

    /// The command line that sends this submission again.
    pub fn resubmit_command(&self) -> String {
        let mut command = format!(
            "jt log {} --duration {} --started {}",
            self.issue,
            format_duration(self.seconds),
            self.started.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        if let Some(message) = self.message() {
            command.push_str(" --message ");
            command.push_str(&shell_quote(message));
        }
        if self.comment {
            command.push_str(" --comment");
        }
        command
    }
}

/// Parses `jt log` arguments and submits them.
pub async fn run<W: Write, T: Transport>(
    writer: &mut W,
    client: &JiraClient<T>,
    issue: IssueKey,
    duration: &str,
    started: Option<&str>,
    message: Option<String>,
    comment: bool,
) -> Result<()> {
    let duration = parse_duration(duration)?;
    let started = match started {
        Some(value) => parse_datetime(value)?,
        None => {
            Utc::now()
                - chrono::Duration::from_std(duration).context("duration out of range")?
        }
    };
    let submission = Submission {
        issue,
        seconds: duration.as_secs(),
        started,
        message,
        comment,
    };
    submit(writer, client, &submission).await
}

/// Sends the work log, then the optional comment.
///
/// The two are independent: a failed comment does not undo the work log,
/// and a failed work log leaves nothing posted.
pub async fn submit<W: Write, T: Transport>(
    writer: &mut W,
    client: &JiraClient<T>,
    submission: &Submission,
) -> Result<()> {
    let key = &submission.issue;
    if let Err(error) = client
        .log_work(key, submission.seconds, submission.started, submission.message())
        .await
    {
        writeln!(
            writer,
            "Work log was not saved. Tracked {} on {key}, started {}.",
            format_duration(submission.seconds),
            submission.started.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
        if submission.seconds > 0 {
            writeln!(writer, "Resubmit with:")?;
            writeln!(writer, "  {}", submission.resubmit_command())?;
        }
        return Err(explain(error).context(format!("failed to log work on {key}")));
    }
    writeln!(
        writer,
        "Logged {} on {key}",
        format_duration(submission.seconds)
    )?;

    if submission.comment {
        let Some(message) = submission.message() else {
            writeln!(writer, "No message given; skipping comment")?;
            return Ok(());
        };
        client
            .post_comment(key, message)
            .await
            .map_err(explain)
            .with_context(|| format!("work log saved, but commenting on {key} failed"))?;
        writeln!(writer, "Comment added to {key}")?;
    }
    Ok(())
}

/// Single-quotes `text` for POSIX shells.
fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}
