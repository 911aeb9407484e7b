//! Test case models
//!
//! Defines the concrete request/expectation pair sent by the runner and the
//! values captured from earlier responses.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP methods used by the suite
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a JSON body is sent with this method
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request plus the status it must answer with
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub method: HttpMethod,
    pub endpoint_path: String,
    pub expected_status: u16,
    pub request_body: Option<Value>,
    pub auth_token: Option<String>,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        method: HttpMethod,
        endpoint_path: impl Into<String>,
        expected_status: u16,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            endpoint_path: endpoint_path.into(),
            expected_status,
            request_body: None,
            auth_token: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Names of values captured from responses and consumed by later steps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKey {
    AdminToken,
    WorkerToken,
    TestUserId,
    TestCallId,
    TestNoteId,
}

impl CaptureKey {
    pub fn name(&self) -> &'static str {
        match self {
            CaptureKey::AdminToken => "admin_token",
            CaptureKey::WorkerToken => "worker_token",
            CaptureKey::TestUserId => "test_user_id",
            CaptureKey::TestCallId => "test_call_id",
            CaptureKey::TestNoteId => "test_note_id",
        }
    }

    /// Template placeholder, e.g. `{test_call_id}`
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.name())
    }

    pub fn all() -> [CaptureKey; 5] {
        [
            CaptureKey::AdminToken,
            CaptureKey::WorkerToken,
            CaptureKey::TestUserId,
            CaptureKey::TestCallId,
            CaptureKey::TestNoteId,
        ]
    }

    pub fn from_name(name: &str) -> Option<CaptureKey> {
        CaptureKey::all().into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for CaptureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values captured during a run, one explicit slot per key
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedValues {
    pub admin_token: Option<Value>,
    pub worker_token: Option<Value>,
    pub test_user_id: Option<Value>,
    pub test_call_id: Option<Value>,
    pub test_note_id: Option<Value>,
}

impl CapturedValues {
    pub fn get(&self, key: CaptureKey) -> Option<&Value> {
        match key {
            CaptureKey::AdminToken => self.admin_token.as_ref(),
            CaptureKey::WorkerToken => self.worker_token.as_ref(),
            CaptureKey::TestUserId => self.test_user_id.as_ref(),
            CaptureKey::TestCallId => self.test_call_id.as_ref(),
            CaptureKey::TestNoteId => self.test_note_id.as_ref(),
        }
    }

    pub fn set(&mut self, key: CaptureKey, value: Value) {
        let slot = match key {
            CaptureKey::AdminToken => &mut self.admin_token,
            CaptureKey::WorkerToken => &mut self.worker_token,
            CaptureKey::TestUserId => &mut self.test_user_id,
            CaptureKey::TestCallId => &mut self.test_call_id,
            CaptureKey::TestNoteId => &mut self.test_note_id,
        };
        *slot = Some(value);
    }

    pub fn contains(&self, key: CaptureKey) -> bool {
        self.get(key).is_some()
    }

    /// Captured value rendered as plain text (strings unquoted)
    pub fn text(&self, key: CaptureKey) -> Option<String> {
        self.get(key).map(value_text)
    }
}

/// Render a JSON scalar the way it should appear in a URL segment or header
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
