//! Templated steps and response shape checks
//!
//! A `Step` is a test case whose path, body and token may refer to values
//! captured by earlier steps. Resolving it against the captured values yields
//! either a concrete `TestCase` or a skip.

use serde_json::Value;
use thiserror::Error;

use crate::models::{value_text, CaptureKey, CapturedValues, HttpMethod, TestCase};

/// Errors raised while turning a step into a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("step '{step}' references {key} but no value was captured")]
    MissingCapture { step: String, key: CaptureKey },
}

/// Value to pull out of a successful response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capture {
    pub field: &'static str,
    pub key: CaptureKey,
}

/// Additional assertion on the response body
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeCheck {
    /// `body[field] == expected`, reporting `detail` alongside
    FieldEquals {
        field: &'static str,
        expected: &'static str,
        detail: &'static str,
    },
    /// Body is a JSON array of `noun`
    IsList { noun: &'static str },
    /// Body has `field`, reporting the `detail` fields alongside
    HasField {
        field: &'static str,
        detail: &'static [&'static str],
    },
}

/// Result of a shape check
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeResult {
    pub ok: bool,
    pub message: String,
}

impl ShapeCheck {
    pub fn evaluate(&self, body: &Value) -> ShapeResult {
        match self {
            ShapeCheck::FieldEquals {
                field,
                expected,
                detail,
            } => match body.get(*field).and_then(Value::as_str) {
                Some(actual) if actual == *expected => ShapeResult {
                    ok: true,
                    message: format!("{field} is {expected} ({})", field_text(body, detail)),
                },
                Some(actual) => ShapeResult {
                    ok: false,
                    message: format!("expected {field} '{expected}', got '{actual}'"),
                },
                None => ShapeResult {
                    ok: false,
                    message: format!("response has no {field}"),
                },
            },
            ShapeCheck::IsList { noun } => match body.as_array() {
                Some(items) => ShapeResult {
                    ok: true,
                    message: format!("Found {} {noun}", items.len()),
                },
                None => ShapeResult {
                    ok: false,
                    message: format!("expected a list of {noun}"),
                },
            },
            ShapeCheck::HasField { field, detail } => {
                if body.get(*field).is_some() {
                    let parts: Vec<String> = std::iter::once(*field)
                        .chain(detail.iter().copied())
                        .map(|f| format!("{f}={}", field_text(body, f)))
                        .collect();
                    ShapeResult {
                        ok: true,
                        message: parts.join(", "),
                    }
                } else {
                    ShapeResult {
                        ok: false,
                        message: format!("response has no {field}"),
                    }
                }
            }
        }
    }
}

fn field_text(body: &Value, field: &str) -> String {
    body.get(field)
        .map(value_text)
        .unwrap_or_else(|| "null".to_string())
}

/// Outcome of resolving a step against the captured values
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Ready(TestCase),
    Skip(CaptureKey),
}

/// One entry of the suite
#[derive(Clone, Debug)]
pub struct Step {
    pub number: u8,
    pub name: &'static str,
    pub category: &'static str,
    pub method: HttpMethod,
    pub path: String,
    pub expected_status: u16,
    pub body: Option<Value>,
    pub auth: Option<CaptureKey>,
    pub requires: Vec<CaptureKey>,
    pub capture: Option<Capture>,
    pub check: Option<ShapeCheck>,
}

impl Step {
    pub fn new(
        number: u8,
        name: &'static str,
        method: HttpMethod,
        path: impl Into<String>,
        expected_status: u16,
    ) -> Self {
        Self {
            number,
            name,
            category: "General",
            method,
            path: path.into(),
            expected_status,
            body: None,
            auth: None,
            requires: Vec::new(),
            capture: None,
            check: None,
        }
    }

    pub fn category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn auth(mut self, key: CaptureKey) -> Self {
        self.auth = Some(key);
        self
    }

    pub fn requires(mut self, key: CaptureKey) -> Self {
        self.requires.push(key);
        self
    }

    pub fn capture(mut self, field: &'static str, key: CaptureKey) -> Self {
        self.capture = Some(Capture { field, key });
        self
    }

    pub fn check(mut self, check: ShapeCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Turn the step into a request, or report the capture it is waiting on
    pub fn resolve(&self, captured: &CapturedValues) -> Result<Resolution, StepError> {
        if let Some(missing) = self.requires.iter().find(|k| !captured.contains(**k)) {
            return Ok(Resolution::Skip(*missing));
        }

        let path = self.resolve_path(captured)?;
        let mut case = TestCase::new(self.name, self.method, path, self.expected_status);

        if let Some(body) = &self.body {
            case = case.with_body(self.resolve_value(body, captured)?);
        }

        // A missing token is sent unauthenticated; the backend decides.
        if let Some(token) = self.auth.and_then(|k| captured.text(k)) {
            case = case.with_token(token);
        }

        Ok(Resolution::Ready(case))
    }

    fn resolve_path(&self, captured: &CapturedValues) -> Result<String, StepError> {
        let mut path = self.path.clone();
        for key in CaptureKey::all() {
            let placeholder = key.placeholder();
            if path.contains(&placeholder) {
                let value = captured.text(key).ok_or_else(|| self.missing(key))?;
                path = path.replace(&placeholder, &value);
            }
        }
        Ok(path)
    }

    fn resolve_value(&self, template: &Value, captured: &CapturedValues) -> Result<Value, StepError> {
        match template {
            Value::String(s) => match placeholder_key(s) {
                Some(key) => captured.get(key).cloned().ok_or_else(|| self.missing(key)),
                None => Ok(template.clone()),
            },
            Value::Array(items) => items
                .iter()
                .map(|v| self.resolve_value(v, captured))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k.clone(), self.resolve_value(v, captured)?);
                }
                Ok(Value::Object(out))
            }
            _ => Ok(template.clone()),
        }
    }

    fn missing(&self, key: CaptureKey) -> StepError {
        StepError::MissingCapture {
            step: self.name.to_string(),
            key,
        }
    }
}

/// `"{test_call_id}"` -> `Some(CaptureKey::TestCallId)`
fn placeholder_key(s: &str) -> Option<CaptureKey> {
    s.strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .and_then(CaptureKey::from_name)
}
