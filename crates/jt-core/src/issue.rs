//! Issues, users and work-log records as seen by the tracker.
//!
//! These records are built from server responses and never mutated locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, IssueKey};

/// A tracked unit of work on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Opaque server-side identifier.
    pub id: String,
    /// Human-readable key, e.g. `PROJ-123`.
    pub key: IssueKey,
    pub summary: String,
    /// Status label, e.g. "In Progress".
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub issue_type: String,
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Most recent comments, oldest first, as returned by the server.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

impl Issue {
    /// Returns the most recent comment, if any.
    pub fn latest_comment(&self) -> Option<&Comment> {
        self.comments.last()
    }
}

/// A comment attached to an issue, flattened to plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: CommentAuthor,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Comment {
    /// Whether this comment was written by `user`.
    pub fn is_by(&self, user: &User) -> bool {
        if let Some(account_id) = &self.author.account_id {
            return account_id == &user.account_id;
        }
        self.author
            .email
            .as_deref()
            .is_some_and(|email| user.matches_email(email))
    }
}

/// Identity of a comment author. Servers omit fields depending on privacy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub account_id: AccountId,
    pub display_name: String,
    pub email: String,
}

impl User {
    /// Compares e-mail addresses case-insensitively.
    pub fn matches_email(&self, email: &str) -> bool {
        !self.email.is_empty() && self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// A work-log entry fetched back from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    pub id: String,
    pub issue_key: IssueKey,
    pub issue_summary: String,
    /// When the logged work started.
    pub started: DateTime<Utc>,
    pub time_spent_seconds: u64,
    /// Comment flattened to plain text; empty when none was given.
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            account_id: AccountId::new("acc-1").unwrap(),
            display_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn comment(account_id: Option<&str>, email: Option<&str>) -> Comment {
        Comment {
            author: CommentAuthor {
                account_id: account_id.map(|id| AccountId::new(id).unwrap()),
                display_name: "Someone".to_string(),
                email: email.map(str::to_string),
            },
            body: "hello".to_string(),
            created: None,
        }
    }

    #[test]
    fn comment_is_by_prefers_account_id() {
        assert!(comment(Some("acc-1"), None).is_by(&user()));
        assert!(!comment(Some("acc-2"), Some("ada@example.com")).is_by(&user()));
    }

    #[test]
    fn comment_is_by_falls_back_to_email() {
        assert!(comment(None, Some("ADA@example.com")).is_by(&user()));
        assert!(!comment(None, Some("bob@example.com")).is_by(&user()));
        assert!(!comment(None, None).is_by(&user()));
    }

    #[test]
    fn user_with_empty_email_matches_nothing() {
        let mut u = user();
        u.email = String::new();
        assert!(!u.matches_email(""));
    }

    #[test]
    fn issue_serializes_without_empty_optionals() {
        let issue = Issue {
            id: "10001".to_string(),
            key: IssueKey::new("PROJ-1").unwrap(),
            summary: "Fix login".to_string(),
            status: "To Do".to_string(),
            assignee: None,
            issue_type: "Bug".to_string(),
            project: "Project".to_string(),
            updated: None,
            created: None,
            comments: Vec::new(),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert!(json.get("assignee").is_none());
        assert!(json.get("comments").is_none());
        assert_eq!(json["key"], "PROJ-1");
        assert!(issue.latest_comment().is_none());
    }
}
