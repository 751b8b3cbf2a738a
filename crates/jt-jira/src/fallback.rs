//! Default issue listing.
//!
//! Sites differ in their workflow statuses, so no single default query works
//! everywhere. Without an explicit query we try a ranked list, most
//! restrictive first, and keep the first one that finds anything. An
//! explicit query is run exactly once and reported as-is.

use async_trait::async_trait;
use thiserror::Error;

use jt_core::Issue;

use crate::client::JiraClient;
use crate::error::JiraError;
use crate::transport::Transport;

/// Built-in queries, tried in order.
pub const DEFAULT_QUERIES: &[&str] = &[
    "assignee = currentUser() AND statusCategory != Done ORDER BY updated DESC",
    "assignee = currentUser() AND resolution = Unresolved ORDER BY updated DESC",
    "assignee = currentUser() AND status NOT IN (Done, Closed, Resolved) ORDER BY updated DESC",
    "assignee = currentUser() ORDER BY updated DESC",
];

/// Anything that can run a search query.
#[async_trait]
pub trait IssueSearch: Send + Sync {
    async fn search_issues(&self, jql: &str) -> Result<Vec<Issue>, JiraError>;
}

#[async_trait]
impl<T: Transport> IssueSearch for JiraClient<T> {
    async fn search_issues(&self, jql: &str) -> Result<Vec<Issue>, JiraError> {
        Self::search_issues(self, jql).await
    }
}

/// Ordered queries to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    candidates: Vec<String>,
}

impl QueryPlan {
    /// Runs only `query`.
    pub fn explicit(query: impl Into<String>) -> Self {
        Self {
            candidates: vec![query.into()],
        }
    }

    /// The built-in cascade, optionally led by a user-configured query.
    pub fn defaults(preferred: Option<&str>) -> Self {
        let mut candidates: Vec<String> = Vec::with_capacity(DEFAULT_QUERIES.len() + 1);
        if let Some(preferred) = preferred.map(str::trim).filter(|q| !q.is_empty()) {
            candidates.push(preferred.to_string());
        }
        for query in DEFAULT_QUERIES {
            if !candidates.iter().any(|existing| existing == query) {
                candidates.push((*query).to_string());
            }
        }
        Self { candidates }
    }

    /// An explicit query if one was given, otherwise the defaults.
    pub fn for_request(explicit: Option<&str>, preferred: Option<&str>) -> Self {
        match explicit.map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => Self::explicit(query),
            None => Self::defaults(preferred),
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

/// The query that produced a listing, with its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub query: String,
    pub issues: Vec<Issue>,
}

/// The query that was being run when the listing failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{source}")]
pub struct QueryError {
    pub query: String,
    #[source]
    pub source: JiraError,
}

/// Runs `plan` against `search`.
///
/// Stops at the first query with results. Empty results and failures the
/// server attributes to the query move on to the next candidate. Any other
/// failure (transport, authentication, response decoding) would hit every
/// query the same way and is returned at once. The last candidate's
/// outcome is returned whatever it is.
pub async fn run_plan<S>(search: &S, plan: &QueryPlan) -> Result<SearchOutcome, QueryError>
where
    S: IssueSearch + ?Sized,
{
    let Some((last, rest)) = plan.candidates.split_last() else {
        return Err(QueryError {
            query: String::new(),
            source: JiraError::InvalidQuery("no query to run".to_string()),
        });
    };

    for query in rest {
        match search.search_issues(query).await {
            Ok(issues) if !issues.is_empty() => {
                return Ok(SearchOutcome {
                    query: query.clone(),
                    issues,
                });
            }
            Ok(_) => tracing::debug!(query = %query, "no issues; trying next query"),
            Err(error) if error.is_query_specific() => {
                tracing::debug!(query = %query, %error, "query failed; trying next query");
            }
            Err(error) => {
                return Err(QueryError {
                    query: query.clone(),
                    source: error,
                });
            }
        }
    }

    match search.search_issues(last).await {
        Ok(issues) => Ok(SearchOutcome {
            query: last.clone(),
            issues,
        }),
        Err(source) => Err(QueryError {
            query: last.clone(),
            source,
        }),
    }
}
