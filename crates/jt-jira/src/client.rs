//! Ticket service REST client.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use jt_core::{Issue, IssueKey, User, WorkLogEntry};

use crate::adf::Node;
use crate::endpoint::{ApiVersion, Connection, Credentials};
use crate::error::JiraError;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
use crate::wire::{
    self, CommentRequest, ErrorPayload, ISSUE_FIELDS, UserWire, WorkLogPage, WorkLogRequest,
    WorkLogWire, format_timestamp,
};

/// Results requested per issue search.
pub const SEARCH_MAX_RESULTS: usize = 50;
/// Upper bound on issues scanned by [`JiraClient::fetch_recent_work_logs`].
pub const HISTORY_MAX_ISSUES: usize = 20;
/// Work-log comment used when the caller gives none.
pub const DEFAULT_WORKLOG_COMMENT: &str = "Time logged with jt";

const HISTORY_QUERY: &str =
    "worklogAuthor = currentUser() AND worklogDate >= -30d ORDER BY updated DESC";
const HISTORY_FIELDS: &str = "summary";

/// Endpoints that exist under more than one API version.
#[derive(Debug, Clone, Copy)]
enum Versioned {
    Myself,
    Search,
}

impl Versioned {
    fn path(self, version: ApiVersion) -> String {
        match self {
            Self::Myself => format!("{}/myself", version.prefix()),
            Self::Search => version.search_path().to_string(),
        }
    }
}

/// Client for one site and one set of credentials.
///
/// The only state it keeps besides its [`Connection`] is the authenticated
/// user, cached after the first lookup.
pub struct JiraClient<T = HttpTransport> {
    connection: Connection,
    transport: T,
    current_user: Mutex<Option<User>>,
}

impl<T> fmt::Debug for JiraClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Creates a client with the default HTTP transport.
    pub fn new(connection: Connection) -> Result<Self, JiraError> {
        Ok(Self::with_transport(connection, HttpTransport::new()?))
    }
}

impl<T: Transport> JiraClient<T> {
    pub fn with_transport(connection: Connection, transport: T) -> Self {
        Self {
            connection,
            transport,
            current_user: Mutex::new(None),
        }
    }

    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Swaps in a new connection and forgets the cached user.
    pub fn reconfigure(&mut self, connection: Connection) {
        self.connection = connection;
        *self
            .current_user
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The user from the last successful [`JiraClient::current_user`] call.
    pub fn cached_user(&self) -> Option<User> {
        self.user_cache().clone()
    }

    /// Looks up the authenticated user and refreshes the cache.
    pub async fn current_user(&self) -> Result<User, JiraError> {
        let (_, response) = self.get_versioned(Versioned::Myself, &[]).await?;
        if response.status != 200 {
            return Err(JiraError::from_status(response.status));
        }
        let user = decode::<UserWire>(&response.body)?.into_user()?;
        *self.user_cache() = Some(user.clone());
        Ok(user)
    }

    /// Runs a search query and returns the matching issues.
    pub async fn search_issues(&self, jql: &str) -> Result<Vec<Issue>, JiraError> {
        self.search(jql, ISSUE_FIELDS, SEARCH_MAX_RESULTS).await
    }

    /// Records `seconds` of work on `issue_key`, started at `started`.
    ///
    /// A blank or missing comment is replaced with [`DEFAULT_WORKLOG_COMMENT`].
    pub async fn log_work(
        &self,
        issue_key: &IssueKey,
        seconds: u64,
        started: DateTime<Utc>,
        comment: Option<&str>,
    ) -> Result<(), JiraError> {
        let text = comment
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_WORKLOG_COMMENT);
        let body = WorkLogRequest {
            time_spent_seconds: seconds,
            started: format_timestamp(started),
            comment: Node::document(text),
        };
        let path = format!("{}/issue/{issue_key}/worklog", ApiVersion::V3.prefix());
        let response = self
            .send(Method::Post, &path, Vec::new(), Some(encode(&body)?))
            .await?;
        expect_created(&response)?;
        tracing::info!(issue = %issue_key, seconds, "work logged");
        Ok(())
    }

    /// Adds a comment to `issue_key`.
    pub async fn post_comment(&self, issue_key: &IssueKey, text: &str) -> Result<(), JiraError> {
        let body = CommentRequest {
            body: Node::document(text.trim()),
        };
        let path = format!("{}/issue/{issue_key}/comment", ApiVersion::V3.prefix());
        let response = self
            .send(Method::Post, &path, Vec::new(), Some(encode(&body)?))
            .await?;
        expect_created(&response)?;
        tracing::info!(issue = %issue_key, "comment posted");
        Ok(())
    }

    /// The user's own work logs from the last 30 days, newest first.
    ///
    /// Looks at no more than [`HISTORY_MAX_ISSUES`] issues. An issue whose
    /// logs cannot be fetched is skipped; only the initial lookups can fail
    /// the whole call.
    pub async fn fetch_recent_work_logs(
        &self,
        limit: usize,
    ) -> Result<Vec<WorkLogEntry>, JiraError> {
        let me = match self.cached_user() {
            Some(user) => user,
            None => self.current_user().await?,
        };
        let issues = self
            .search(HISTORY_QUERY, HISTORY_FIELDS, HISTORY_MAX_ISSUES)
            .await?;

        let mut entries = Vec::new();
        for issue in issues.iter().take(HISTORY_MAX_ISSUES) {
            match self.issue_work_logs(&issue.key).await {
                Ok(worklogs) => entries.extend(
                    worklogs
                        .into_iter()
                        .filter(|worklog| is_authored_by(worklog, &me))
                        .filter_map(|worklog| worklog.into_entry(&issue.key, &issue.summary)),
                ),
                Err(error) => {
                    tracing::warn!(issue = %issue.key, %error, "skipping work logs for issue");
                }
            }
        }

        entries.sort_by(|a, b| b.started.cmp(&a.started));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn issue_work_logs(&self, issue_key: &IssueKey) -> Result<Vec<WorkLogWire>, JiraError> {
        let path = format!("{}/issue/{issue_key}/worklog", ApiVersion::V3.prefix());
        let response = self.send(Method::Get, &path, Vec::new(), None).await?;
        if response.status != 200 {
            return Err(JiraError::from_status(response.status));
        }
        Ok(decode::<WorkLogPage>(&response.body)?.worklogs)
    }

    async fn search(
        &self,
        jql: &str,
        fields: &str,
        max_results: usize,
    ) -> Result<Vec<Issue>, JiraError> {
        self.authorization()?;
        if jql.trim().is_empty() {
            return Err(JiraError::InvalidQuery("query cannot be empty".to_string()));
        }

        let query = vec![
            ("jql".to_string(), jql.to_string()),
            ("fields".to_string(), fields.to_string()),
            ("maxResults".to_string(), max_results.to_string()),
        ];
        let (version, response) = self.get_versioned(Versioned::Search, &query).await?;
        match response.status {
            200 => match version {
                ApiVersion::V3 => decode::<wire::v3::SearchResponse>(&response.body)?.into_issues(),
                ApiVersion::V2 => decode::<wire::v2::SearchResponse>(&response.body)?.into_issues(),
            },
            400 => Err(JiraError::InvalidQuery(
                ErrorPayload::parse_message(&response.body)
                    .unwrap_or_else(|| "the server rejected the query".to_string()),
            )),
            status => Err(JiraError::from_status(status)),
        }
    }

    /// GETs `endpoint` on the current API version, retrying once on the
    /// previous version if the server answers 410.
    async fn get_versioned(
        &self,
        endpoint: Versioned,
        query: &[(String, String)],
    ) -> Result<(ApiVersion, ApiResponse), JiraError> {
        let current = ApiVersion::CURRENT;
        let response = self
            .send(Method::Get, &endpoint.path(current), query.to_vec(), None)
            .await?;
        if response.status != 410 {
            return Ok((current, response));
        }

        let Some(previous) = current.previous() else {
            return Err(JiraError::EndpointRemoved);
        };
        tracing::warn!(
            ?endpoint,
            from = ?current,
            to = ?previous,
            "endpoint removed; retrying on older API version"
        );
        let response = self
            .send(Method::Get, &endpoint.path(previous), query.to_vec(), None)
            .await?;
        if response.status == 410 {
            return Err(JiraError::EndpointRemoved);
        }
        Ok((previous, response))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, JiraError> {
        let authorization = self.authorization()?;
        let request = ApiRequest {
            method,
            url: self.connection.url(path),
            query,
            authorization,
            body,
        };
        tracing::debug!(?method, url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }

    fn authorization(&self) -> Result<String, JiraError> {
        self.connection
            .credentials()
            .map(Credentials::basic_auth)
            .ok_or(JiraError::NotAuthenticated)
    }

    fn user_cache(&self) -> MutexGuard<'_, Option<User>> {
        self.current_user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Matches by e-mail; falls back to the account id when the server hides
/// the author's e-mail.
fn is_authored_by(worklog: &WorkLogWire, user: &User) -> bool {
    if let Some(email) = worklog.author_email() {
        return user.matches_email(email);
    }
    worklog
        .author
        .as_ref()
        .and_then(|author| author.account_id.as_deref())
        .is_some_and(|id| id == user.account_id.as_str())
}

fn expect_created(response: &ApiResponse) -> Result<(), JiraError> {
    if response.status == 201 {
        Ok(())
    } else {
        Err(JiraError::from_status(response.status))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, JiraError> {
    serde_json::from_str(body).map_err(|err| JiraError::InvalidResponse(err.to_string()))
}

fn encode<T: serde::Serialize>(body: &T) -> Result<serde_json::Value, JiraError> {
    serde_json::to_value(body)
        .map_err(|err| JiraError::NetworkError(format!("failed to encode request: {err}")))
}
