//! HTTP transport.
//!
//! The client builds [`ApiRequest`]s and hands them to a [`Transport`]. The
//! production transport is [`HttpTransport`], a thin wrapper over `reqwest`
//! that also classifies low-level failures into [`JiraError`].

use std::error::Error as _;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;

use crate::error::JiraError;

/// Idle timeout for a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Upper bound for the whole exchange, including the body.
const RESOURCE_TIMEOUT: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("jt/", env!("CARGO_PKG_VERSION"), " (work-log timer)");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully built request.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Value of the `Authorization` header.
    pub authorization: String,
    pub body: Option<serde_json::Value>,
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query", &self.query)
            .field("authorization", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ApiRequest {
    /// Looks up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Executes requests. Implementations must classify their own failures.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JiraError>;
}

/// `reqwest`-backed transport.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, JiraError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .read_timeout(REQUEST_TIMEOUT)
            .timeout(RESOURCE_TIMEOUT)
            .build()
            .map_err(|err| classify(&err))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JiraError> {
        let mut builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
        };
        builder = builder.header(header::AUTHORIZATION, &request.authorization);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| classify(&err))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| classify(&err))?;
        Ok(ApiResponse { status, body })
    }
}

/// Maps a `reqwest` failure into the error taxonomy.
fn classify(err: &reqwest::Error) -> JiraError {
    if err.is_timeout() {
        return JiraError::Timeout;
    }
    if err.is_builder() {
        return JiraError::InvalidUrl;
    }
    let detail = error_chain(err);
    if err.is_connect() {
        return classify_connect_failure(&detail);
    }
    if err.is_decode() || err.is_body() {
        return JiraError::InvalidResponse(detail);
    }
    JiraError::NetworkError(detail)
}

/// Distinguishes certificate and handshake problems from plain connect failures.
fn classify_connect_failure(detail: &str) -> JiraError {
    let lower = detail.to_ascii_lowercase();
    if lower.contains("certificate") || lower.contains("unknownissuer") {
        JiraError::UntrustedCertificate
    } else if lower.contains("tls") || lower.contains("handshake") || lower.contains("ssl") {
        JiraError::TlsHandshakeFailed
    } else {
        JiraError::ConnectionFailed
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
