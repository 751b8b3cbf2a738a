//! Foreground timer for one issue.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;

use jt_core::{IssueKey, Timer, format_elapsed};
use jt_jira::{JiraClient, Transport};

use super::log::{Submission, submit};
use super::util::explain;

const TICK: Duration = Duration::from_secs(1);

/// Tracks `key` until Ctrl-C, then submits the work log.
pub async fn run<W: Write, T: Transport>(
    writer: &mut W,
    client: &JiraClient<T>,
    key: &IssueKey,
    message: Option<String>,
    comment: bool,
) -> Result<()> {
    let stop = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "cannot listen for Ctrl-C; stopping timer");
        }
    };
    run_until(writer, client, key, message, comment, stop).await
}

/// Like [`run`], with the stop signal supplied by the caller.
pub async fn run_until<W, T, F>(
    writer: &mut W,
    client: &JiraClient<T>,
    key: &IssueKey,
    message: Option<String>,
    comment: bool,
    stop: F,
) -> Result<()>
where
    W: Write,
    T: Transport,
    F: Future<Output = ()>,
{
    let issue = client
        .search_issues(&format!("key = {key}"))
        .await
        .map_err(explain)?
        .into_iter()
        .find(|issue| issue.key == *key)
        .ok_or_else(|| anyhow::anyhow!("Issue {key} not found"))?;

    writeln!(writer, "Tracking {}: {}", issue.key, issue.summary)?;
    writeln!(writer, "Press Ctrl-C to stop and log the time.")?;

    let mut timer = Timer::new();
    timer.start(issue);

    let mut ticker = tokio::time::interval(TICK);
    tokio::pin!(stop);
    loop {
        tokio::select! {
            () = &mut stop => break,
            _ = ticker.tick() => {
                eprint!("\r{key}  {}", format_elapsed(timer.elapsed()));
                if let Err(error) = std::io::stderr().flush() {
                    tracing::debug!(%error, "could not flush timer display");
                }
            }
        }
    }
    eprintln!();

    let Some(result) = timer.stop() else {
        anyhow::bail!("timer was not running");
    };
    writeln!(writer, "Stopped after {}", format_elapsed(result.duration))?;
    let submission = Submission::from_timer(&result, message, comment);
    submit(writer, client, &submission).await
}
