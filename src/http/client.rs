//! HTTP client for the API under test
//!
//! Thin wrapper over reqwest that knows the base URL, the request timeout and
//! how a `TestCase` maps to a JSON request.

#![allow(dead_code)]

use reqwest::{header::CONTENT_TYPE, Client, Method};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use crate::models::{HttpMethod, TestCase};

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection to {0} failed: {1}")]
    ConnectionFailed(String, String),

    #[error("Failed to read response body: {0}")]
    BodyRead(String),

    #[error("Failed to create HTTP client: {0}")]
    Build(String),
}

/// HTTP client bound to one API base URL
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL; an empty path addresses the API root
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send the request described by a test case
    pub async fn send(&self, case: &TestCase) -> Result<HttpResponse, HttpError> {
        let url = self.build_url(&case.endpoint_path);
        debug!("Sending {} request to {}", case.method, url);

        let mut req_builder = self
            .client
            .request(to_reqwest_method(case.method), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = &case.auth_token {
            req_builder = req_builder.bearer_auth(token);
        }

        if case.method.carries_body() {
            if let Some(body) = &case.request_body {
                req_builder = req_builder.json(body);
            }
        }

        let start = Instant::now();

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                HttpError::ConnectionFailed(url.clone(), e.to_string())
            } else {
                HttpError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else {
                HttpError::BodyRead(e.to_string())
            }
        })?;

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            start.elapsed().as_millis()
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            body,
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// HTTP response
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
}

impl HttpResponse {
    /// Body parsed as JSON; an empty or unparseable body yields `{}`
    pub fn json(&self) -> Value {
        if self.body.trim().is_empty() {
            return Value::Object(Default::default());
        }
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::Object(Default::default()))
    }
}
