//! Ticket service REST client for the jt work-log tracker.
//!
//! Provides:
//! - Site URL normalization and HTTP Basic credentials
//! - Issue search with a one-step API version fallback
//! - Work-log and comment submission
//! - Recent work-log history for the signed-in user
//! - A ranked fallback cascade for default issue listings

pub mod adf;
mod client;
mod endpoint;
mod error;
mod fallback;
mod transport;
pub mod wire;

#[cfg(test)]
mod testing;

pub use client::{DEFAULT_WORKLOG_COMMENT, HISTORY_MAX_ISSUES, JiraClient, SEARCH_MAX_RESULTS};
pub use endpoint::{ApiVersion, Connection, Credentials, HOSTED_SUFFIX, normalize_domain};
pub use error::JiraError;
pub use fallback::{DEFAULT_QUERIES, IssueSearch, QueryError, QueryPlan, SearchOutcome, run_plan};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
