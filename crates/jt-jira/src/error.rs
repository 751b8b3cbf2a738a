//! Failure taxonomy for ticket service calls.

use thiserror::Error;

/// Errors returned by every client operation.
///
/// Transport failures are classified once, in the transport, and passed up
/// unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JiraError {
    /// No e-mail or API token is configured.
    #[error("not signed in: configure your e-mail and API token first")]
    NotAuthenticated,
    /// The configured site does not form a valid URL.
    #[error("invalid site URL")]
    InvalidUrl,
    /// The server answered with something that is not the expected JSON.
    #[error("invalid response from server: {0}")]
    InvalidResponse(String),
    /// HTTP 401.
    #[error("authentication failed: check your e-mail and API token")]
    Unauthorized,
    /// HTTP 400 on a search; the query itself needs fixing.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// Any other non-success status.
    #[error("server error (HTTP {0})")]
    ServerError(u16),
    /// HTTP 410; the API version no longer serves this endpoint.
    #[error("API endpoint has been removed by the server")]
    EndpointRemoved,
    #[error("secure connection failed during TLS handshake")]
    TlsHandshakeFailed,
    #[error("server certificate is not trusted")]
    UntrustedCertificate,
    #[error("request timed out")]
    Timeout,
    #[error("could not connect to server")]
    ConnectionFailed,
    #[error("network error: {0}")]
    NetworkError(String),
}

impl JiraError {
    /// Whether the user has to revisit configuration before anything else can work.
    pub const fn requires_reconfiguration(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::Unauthorized | Self::InvalidUrl
        )
    }

    /// Whether a different query could succeed where this one failed.
    ///
    /// Transport and authentication failures are the same for every query.
    pub const fn is_query_specific(&self) -> bool {
        matches!(self, Self::InvalidQuery(_) | Self::ServerError(_))
    }

    /// Maps a non-success status from any endpoint.
    pub(crate) const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            410 => Self::EndpointRemoved,
            code => Self::ServerError(code),
        }
    }
}
