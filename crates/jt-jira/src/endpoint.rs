//! Site URL normalization, API versions and connection settings.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::JiraError;

/// Host suffix of the hosted (cloud) service.
pub const HOSTED_SUFFIX: &str = ".atlassian.net";

/// Turns a user-entered site into a base URL without a trailing slash.
///
/// - `acme` becomes `https://acme.atlassian.net`
/// - `acme.atlassian.net` (or any other host name) gets `https://` prepended
/// - anything starting with `http://` or `https://` is kept as entered
///
/// The result always carries a scheme, so normalizing twice is a no-op.
pub fn normalize_domain(input: &str) -> Result<String, JiraError> {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(JiraError::InvalidUrl);
    }

    let lower = trimmed.to_ascii_lowercase();
    let base = if lower.starts_with("https://") || lower.starts_with("http://") {
        trimmed.to_string()
    } else if trimmed.contains('.') {
        format!("https://{trimmed}")
    } else {
        format!("https://{trimmed}{HOSTED_SUFFIX}")
    };

    let parsed = reqwest::Url::parse(&base).map_err(|_| JiraError::InvalidUrl)?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(JiraError::InvalidUrl);
    }
    Ok(base)
}

/// REST API versions, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V2,
    V3,
}

impl ApiVersion {
    pub const CURRENT: Self = Self::V3;

    /// The version a removed endpoint falls back to.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::V3 => Some(Self::V2),
            Self::V2 => None,
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::V2 => "/rest/api/2",
            Self::V3 => "/rest/api/3",
        }
    }

    /// Path of the issue search endpoint for this version.
    pub const fn search_path(self) -> &'static str {
        match self {
            Self::V2 => "/rest/api/2/search",
            Self::V3 => "/rest/api/3/search/jql",
        }
    }
}

/// E-mail and API token used for HTTP Basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Returns `None` if either part is blank.
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Option<Self> {
        let email = email.into().trim().to_string();
        let token = token.into().trim().to_string();
        if email.is_empty() || token.is_empty() {
            return None;
        }
        Some(Self { email, token })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Value of the `Authorization` header.
    pub fn basic_auth(&self) -> String {
        let encoded = BASE64.encode(format!("{}:{}", self.email, self.token));
        format!("Basic {encoded}")
    }
}

/// Immutable snapshot of everything the client needs to reach the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    base_url: String,
    credentials: Option<Credentials>,
}

impl Connection {
    /// Builds a connection from a raw site value.
    pub fn new(domain: &str, credentials: Option<Credentials>) -> Result<Self, JiraError> {
        Ok(Self {
            base_url: normalize_domain(domain)?,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Absolute URL for an API path such as `/rest/api/3/myself`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
