//! Response shapes of the REST API, per version.
//!
//! v2 and v3 return the same issue structure except for comment bodies: v2
//! sends plain strings, v3 sends rich-text documents. Issue decoding is
//! generic over the body type so version differences stop here.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use jt_core::{AccountId, Comment, CommentAuthor, Issue, IssueKey, User, WorkLogEntry};

use crate::adf::Node;
use crate::error::JiraError;

/// Fields requested for issue listings.
pub const ISSUE_FIELDS: &str = "summary,status,assignee,issuetype,project,updated,created,comment";

/// Timestamp format used on the wire, e.g. `2024-01-15T09:30:00.000+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Formats a timestamp in the zero-offset form the worklog API requires.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses server timestamps in either the numeric-offset or RFC 3339 form.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A comment body that can be flattened to plain text.
pub trait CommentBody {
    fn into_text(self) -> String;
}

impl CommentBody for String {
    fn into_text(self) -> String {
        self
    }
}

impl CommentBody for Node {
    fn into_text(self) -> String {
        self.plain_text()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWire {
    #[serde(default)]
    pub account_id: Option<String>,
    /// Server deployments identify users by `name`/`key` instead of `accountId`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

impl UserWire {
    pub fn into_user(self) -> Result<User, JiraError> {
        let id = self
            .account_id
            .or(self.name)
            .or(self.key)
            .ok_or_else(|| JiraError::InvalidResponse("user has no account id".to_string()))?;
        let account_id =
            AccountId::new(id).map_err(|err| JiraError::InvalidResponse(err.to_string()))?;
        let email = self.email_address.unwrap_or_default();
        let display_name = self
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.clone());
        Ok(User {
            account_id,
            display_name,
            email,
        })
    }

    fn into_author(self) -> CommentAuthor {
        CommentAuthor {
            account_id: self.account_id.and_then(|id| AccountId::new(id).ok()),
            display_name: self.display_name.unwrap_or_default(),
            email: self.email_address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNamed {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentPage<B> {
    #[serde(default = "Vec::new")]
    pub comments: Vec<CommentWire<B>>,
}

#[derive(Debug, Deserialize)]
pub struct CommentWire<B> {
    #[serde(default)]
    pub author: Option<UserWire>,
    pub body: Option<B>,
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IssueFields<B> {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<Named>,
    #[serde(default)]
    pub assignee: Option<DisplayNamed>,
    #[serde(default)]
    pub issuetype: Option<Named>,
    #[serde(default)]
    pub project: Option<Named>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    pub comment: Option<CommentPage<B>>,
}

#[derive(Debug, Deserialize)]
pub struct IssueWire<B> {
    pub id: String,
    pub key: String,
    pub fields: IssueFields<B>,
}

impl<B: CommentBody> IssueWire<B> {
    pub fn into_issue(self) -> Result<Issue, JiraError> {
        let key =
            IssueKey::new(self.key).map_err(|err| JiraError::InvalidResponse(err.to_string()))?;
        let fields = self.fields;
        let comments = fields
            .comment
            .map(|page| page.comments)
            .unwrap_or_default()
            .into_iter()
            .map(|comment| Comment {
                author: comment.author.map_or_else(
                    || CommentAuthor {
                        account_id: None,
                        display_name: String::new(),
                        email: None,
                    },
                    UserWire::into_author,
                ),
                body: comment.body.map(CommentBody::into_text).unwrap_or_default(),
                created: comment.created.as_deref().and_then(parse_timestamp),
            })
            .collect();

        Ok(Issue {
            id: self.id,
            key,
            summary: fields.summary.unwrap_or_default(),
            status: fields.status.map(|s| s.name).unwrap_or_default(),
            assignee: fields.assignee.and_then(|a| a.display_name),
            issue_type: fields.issuetype.map(|t| t.name).unwrap_or_default(),
            project: fields.project.map(|p| p.name).unwrap_or_default(),
            updated: fields.updated.as_deref().and_then(parse_timestamp),
            created: fields.created.as_deref().and_then(parse_timestamp),
            comments,
        })
    }
}

/// Search responses. Only `issues` is shared between versions; paging
/// fields differ and are not used.
#[derive(Debug, Deserialize)]
pub struct SearchResponse<B> {
    #[serde(default = "Vec::new")]
    pub issues: Vec<IssueWire<B>>,
}

impl<B: CommentBody> SearchResponse<B> {
    pub fn into_issues(self) -> Result<Vec<Issue>, JiraError> {
        self.issues.into_iter().map(IssueWire::into_issue).collect()
    }
}

pub mod v2 {
    /// `GET /rest/api/2/search`.
    pub type SearchResponse = super::SearchResponse<String>;
}

pub mod v3 {
    use crate::adf::Node;

    /// `GET /rest/api/3/search/jql`.
    pub type SearchResponse = super::SearchResponse<Node>;
}

#[derive(Debug, Deserialize)]
pub struct WorkLogPage {
    #[serde(default)]
    pub worklogs: Vec<WorkLogWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogWire {
    pub id: String,
    #[serde(default)]
    pub author: Option<UserWire>,
    #[serde(default)]
    pub comment: Option<Node>,
    pub started: String,
    #[serde(default)]
    pub time_spent_seconds: u64,
}

impl WorkLogWire {
    pub fn author_email(&self) -> Option<&str> {
        self.author.as_ref()?.email_address.as_deref()
    }

    /// Returns `None` when `started` cannot be parsed.
    pub fn into_entry(self, issue_key: &IssueKey, issue_summary: &str) -> Option<WorkLogEntry> {
        let started = parse_timestamp(&self.started)?;
        Some(WorkLogEntry {
            id: self.id,
            issue_key: issue_key.clone(),
            issue_summary: issue_summary.to_string(),
            started,
            time_spent_seconds: self.time_spent_seconds,
            comment: self.comment.map(|doc| doc.plain_text()).unwrap_or_default(),
        })
    }
}

/// Body of a work-log submission.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogRequest {
    pub time_spent_seconds: u64,
    pub started: String,
    pub comment: Node,
}

/// Body of a comment submission.
#[derive(Debug, serde::Serialize)]
pub struct CommentRequest {
    pub body: Node,
}

/// Error payload returned with 4xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: std::collections::BTreeMap<String, String>,
}

impl ErrorPayload {
    /// Joins all messages, or returns `None` if the body carried none.
    pub fn parse_message(body: &str) -> Option<String> {
        let payload: Self = serde_json::from_str(body).ok()?;
        let messages: Vec<String> = payload
            .error_messages
            .into_iter()
            .chain(
                payload
                    .errors
                    .into_iter()
                    .map(|(field, message)| format!("{field}: {message}")),
            )
            .collect();
        if messages.is_empty() {
            None
        } else {
            Some(messages.join("; "))
        }
    }
}
