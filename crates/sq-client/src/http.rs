//! Shared HTTP helpers: query strings and response status mapping.
//!
//! Centralizes status-code checks (401/403, 404, 429 with `Retry-After`
//! parsing, other non-success → [`ClientError::Api`]) so endpoint modules
//! stay focused on request construction and response mapping.

use serde::Deserialize;

use crate::error::ClientError;

// ── Query ──────────────────────────────────────────────────────────

/// Ordered query parameters, URL-encoded when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Add a parameter if `value` is `Some`.
    #[must_use]
    pub fn opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Add a comma-joined list parameter, skipped when the list is empty.
    #[must_use]
    pub fn list<S: AsRef<str>>(self, key: &str, values: &[S]) -> Self {
        if values.is_empty() {
            return self;
        }
        let joined = values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        self.param(key, joined)
    }

    /// Set a parameter, replacing any previous value for the same key.
    pub fn set(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.0.push((key.to_string(), value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as `k1=v1&k2=v2`, URL-encoding keys and values.
    #[must_use]
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// ── Responses ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorBody {
    errors: Vec<ErrorMessage>,
}

#[derive(Deserialize)]
struct ErrorMessage {
    msg: String,
}

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. Handles:
/// - **401/403** → [`ClientError::Unauthorized`]
/// - **404** → [`ClientError::NotFound`]
/// - **429 Too Many Requests** → [`ClientError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Other non-success status** → [`ClientError::Api`] with the status
///   code and the server's first error message.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status().as_u16();
    if status == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(ClientError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if resp.status().is_success() {
        return Ok(resp);
    }

    let message = error_message(&resp.text().await.unwrap_or_default());
    Err(match status {
        401 | 403 => ClientError::Unauthorized { status, message },
        404 => ClientError::NotFound(message),
        _ => ClientError::Api { status, message },
    })
}

/// The first `errors[].msg` of an error body, or the body itself.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.errors.into_iter().next())
        .map_or_else(|| body.trim().to_string(), |error| error.msg)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
