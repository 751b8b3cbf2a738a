//! Canned server for command tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use jt_jira::{
    ApiRequest, ApiResponse, Connection, Credentials, JiraClient, JiraError, Method, Transport,
};

pub const BASE_URL: &str = "https://acme.atlassian.net";

/// Answers by method and path; anything unrouted gets a 404.
#[derive(Default)]
pub struct StubTransport {
    routes: Vec<(Method, String, ApiResponse)>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    pub fn route(
        mut self,
        method: Method,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.routes
            .push((method, path.to_string(), ApiResponse::new(status, body)));
        self
    }

    /// `METHOD path` for each request, in send order.
    pub fn calls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| {
                format!(
                    "{:?} {}",
                    request.method,
                    request.url.trim_start_matches(BASE_URL)
                )
            })
            .collect()
    }

    pub fn bodies(&self) -> Vec<serde_json::Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|request| request.body.clone())
            .collect()
    }

    pub fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|request| request.query_param("jql").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JiraError> {
        let path = request.url.trim_start_matches(BASE_URL).to_string();
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .routes
            .iter()
            .find(|(method, route, _)| *method == request.method && *route == path)
            .map_or_else(|| ApiResponse::new(404, ""), |(_, _, response)| response.clone()))
    }
}

pub fn client(transport: StubTransport) -> JiraClient<StubTransport> {
    let connection =
        Connection::new("acme", Credentials::new("ada@example.com", "token")).unwrap();
    JiraClient::with_transport(connection, transport)
}

pub fn issue_json(key: &str, summary: &str, status: &str) -> serde_json::Value {
    json!({
        "id": format!("id-{key}"),
        "key": key,
        "fields": {
            "summary": summary,
            "status": {"name": status},
            "issuetype": {"name": "Task"},
            "project": {"name": "Project"}
        }
    })
}

pub fn search_body(issues: &[serde_json::Value]) -> String {
    json!({ "issues": issues }).to_string()
}

pub fn myself_body() -> String {
    json!({
        "accountId": "acc-1",
        "displayName": "Ada Lovelace",
        "emailAddress": "ada@example.com"
    })
    .to_string()
}
