//! # Response Schemas
//!
//! Bodies returned by the processing service. Every field is optional;
//! callers decide the fallback for anything missing.

use serde::Deserialize;

/// Body of a non-2xx answer from either endpoint
///
/// The service documents `{message}`. Framework-generated errors carry
/// `{detail}` instead, which is used when `message` is absent.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// First non-blank of `message`, then a string `detail`
    pub fn usable_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                self.detail
                    .as_ref()
                    .and_then(|d| d.as_str())
                    .filter(|m| !m.trim().is_empty())
            })
    }
}

/// Extract the error text from a failed response body, or use `fallback`
/// when the body is not JSON or has nothing usable.
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .as_ref()
        .and_then(ErrorBody::usable_message)
        .unwrap_or(fallback)
        .to_string()
}

/// Body of a 2xx answer: `{status, message?}`
///
/// Only `status == "error"` is significant; the service also answers with
/// `"ok"` or `"success"`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct StatusBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusBody {
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}
