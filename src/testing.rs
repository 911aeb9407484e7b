//! In-process HTTP stub for tests
//!
//! Serves canned JSON responses on `127.0.0.1:0` and records every request
//! it receives, so the runner can be exercised end to end.

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as seen by the stub
#[derive(Clone, Debug, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// Canned response for a method/path, optionally narrowed by body or token
#[derive(Clone, Debug)]
pub struct StubRoute {
    method: String,
    path: String,
    body_contains: Option<String>,
    bearer: Option<String>,
    status: u16,
    response: String,
}

impl StubRoute {
    pub fn new(method: &str, path: &str, status: u16, response: impl Into<String>) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            body_contains: None,
            bearer: None,
            status,
            response: response.into(),
        }
    }

    pub fn when_body_contains(mut self, needle: &str) -> Self {
        self.body_contains = Some(needle.to_string());
        self
    }

    pub fn when_bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn matches_path(&self, method: &str, path: &str) -> bool {
        self.method == method && self.path == path
    }

    fn matches(&self, req: &RecordedRequest) -> bool {
        self.method == req.method
            && self.path == req.path
            && self
                .body_contains
                .as_ref()
                .map_or(true, |needle| req.body.contains(needle.as_str()))
            && self.bearer.as_ref().map_or(true, |token| {
                req.authorization.as_deref() == Some(format!("Bearer {token}").as_str())
            })
    }
}

/// Shared state of the stub handler
#[derive(Clone)]
struct StubState {
    routes: Arc<Vec<StubRoute>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Running stub server; aborted on drop
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Serve `routes`; the first matching route wins, anything else is a 404
    pub async fn start(routes: Vec<StubRoute>) -> Self {
        let state = StubState {
            routes: Arc::new(routes),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = state.requests.clone();
        let app = Router::new().fallback(answer).with_state(state);
        Self::serve(app, requests).await
    }

    /// Accept requests but never answer
    pub async fn silent() -> Self {
        let app = Router::new().fallback(|| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            StatusCode::NO_CONTENT
        });
        Self::serve(app, Arc::new(Mutex::new(Vec::new()))).await
    }

    async fn serve(app: Router, requests: Arc<Mutex<Vec<RecordedRequest>>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server failed");
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Base URL of a port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn answer(
    State(stub): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let request = RecordedRequest {
        method: method.as_str().to_string(),
        path: uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string()),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body,
    };

    let (status, response) = stub
        .routes
        .iter()
        .find(|r| r.matches(&request))
        .map(|r| (r.status, r.response.clone()))
        .unwrap_or((404, r#"{"detail":"Not Found"}"#.to_string()));

    stub.requests.lock().unwrap().push(request);

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_answers_and_records_over_one_connection() {
        let server = StubServer::start(vec![
            StubRoute::new("POST", "/auth/login", 200, r#"{"token":"t1"}"#)
                .when_body_contains("admin"),
            StubRoute::new("GET", "/auth/me", 200, r#"{"role":"admin"}"#).when_bearer("t1"),
        ])
        .await;
        let client = reqwest::Client::new();

        let login = client
            .post(format!("{}/auth/login", server.base_url()))
            .json(&serde_json::json!({"username": "admin"}))
            .send()
            .await
            .unwrap();
        assert_eq!(login.status().as_u16(), 200);
        assert_eq!(login.text().await.unwrap(), r#"{"token":"t1"}"#);

        let me = client
            .get(format!("{}/auth/me", server.base_url()))
            .bearer_auth("t1")
            .send()
            .await
            .unwrap();
        assert_eq!(me.status().as_u16(), 200);

        let missing = client
            .get(format!("{}/stats?day=1", server.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status().as_u16(), 404);

        let requests = server.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
        assert!(requests[0].body.contains("admin"));
        assert_eq!(requests[1].authorization.as_deref(), Some("Bearer t1"));
        assert_eq!(requests[2].path, "/stats?day=1");
    }
}
