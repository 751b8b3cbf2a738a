//! Scripted transport for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::JiraClient;
use crate::endpoint::{Connection, Credentials};
use crate::error::JiraError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

pub const BASE_URL: &str = "https://acme.atlassian.net";

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, JiraError> + Send + Sync;

/// Answers every request with a handler and records what was sent.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(
        handler: impl Fn(&ApiRequest) -> Result<ApiResponse, JiraError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Request paths relative to [`BASE_URL`], in send order.
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.url.trim_start_matches(BASE_URL).to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JiraError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.handler)(&request)
    }
}

/// Client for `acme` signed in as `ada@example.com`.
pub fn client(
    handler: impl Fn(&ApiRequest) -> Result<ApiResponse, JiraError> + Send + Sync + 'static,
) -> JiraClient<ScriptedTransport> {
    let credentials = Credentials::new("ada@example.com", "token");
    let connection = Connection::new("acme", credentials).unwrap();
    JiraClient::with_transport(connection, ScriptedTransport::new(handler))
}

/// Client with no credentials configured.
pub fn anonymous_client(
    handler: impl Fn(&ApiRequest) -> Result<ApiResponse, JiraError> + Send + Sync + 'static,
) -> JiraClient<ScriptedTransport> {
    let connection = Connection::new("acme", None).unwrap();
    JiraClient::with_transport(connection, ScriptedTransport::new(handler))
}

pub fn myself_body() -> String {
    serde_json::json!({
        "accountId": "acc-1",
        "displayName": "Ada Lovelace",
        "emailAddress": "ada@example.com"
    })
    .to_string()
}
