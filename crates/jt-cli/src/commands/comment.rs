//! Adds a comment to an issue.

use std::io::Write;

use anyhow::{Context, Result};

use jt_core::IssueKey;
use jt_jira::{JiraClient, Transport};

use super::util::explain;

pub async fn run<W: Write, T: Transport>(
    writer: &mut W,
    client: &JiraClient<T>,
    key: &IssueKey,
    text: &str,
) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Comment text cannot be empty");
    }
    client
        .post_comment(key, text)
        .await
        .map_err(explain)
        .with_context(|| format!("failed to comment on {key}"))?;
    writeln!(writer, "Comment added to {key}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use jt_jira::Method;

    use crate::commands::testing::{StubTransport, client};

    const COMMENT_PATH: &str = "/rest/api/3/issue/PROJ-4/comment";

    #[tokio::test]
    async fn posts_comment_as_document() {
        let client = client(StubTransport::default().route(Method::Post, COMMENT_PATH, 201, "{}"));
        let key = IssueKey::new("PROJ-4").unwrap();

        let mut output = Vec::new();
        run(&mut output, &client, &key, "Ready for review").await.unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "Comment added to PROJ-4\n");
        let bodies = client.transport().bodies();
        assert_eq!(
            bodies[0]["body"]["content"][0]["content"][0]["text"],
            "Ready for review"
        );
    }

    #[tokio::test]
    async fn blank_text_is_rejected_locally() {
        let client = client(StubTransport::default());
        let key = IssueKey::new("PROJ-4").unwrap();

        assert!(run(&mut Vec::new(), &client, &key, "  ").await.is_err());
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn server_rejection_names_the_issue() {
        let client = client(StubTransport::default().route(Method::Post, COMMENT_PATH, 403, ""));
        let key = IssueKey::new("PROJ-4").unwrap();

        let err = run(&mut Vec::new(), &client, &key, "hello").await.unwrap_err();
        assert_eq!(err.to_string(), "failed to comment on PROJ-4");
        assert!(format!("{err:#}").contains("HTTP 403"));
    }
}
