//! Auth API module: duplicate check and code dispatch

mod client;
mod traits;

pub use client::HttpAuthApi;
pub use traits::AuthApi;

#[cfg(test)]
pub use traits::MockAuthApi;

use serde_json::Value;
use std::fmt;

/// Message the server uses for an already registered address
const DUPLICATE_EMAIL_MESSAGE: &str = "Duplicate Email";
/// First entry of the server's validation message list for a malformed address
const MALFORMED_EMAIL_MESSAGE: &str = "email must be an email";

/// Opaque value returned by code dispatch and consumed by the confirmation widget
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct CorrelationValue(String);

impl CorrelationValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts `{"number": 123456}` or `{"number": "123456"}`
    pub fn from_dispatch_body(body: &Value) -> Result<Self, ApiError> {
        match body.get("number") {
            Some(Value::Number(n)) => Ok(Self(n.to_string())),
            Some(Value::String(s)) => Ok(Self(s.clone())),
            _ => Err(ApiError::InvalidBody(body.to_string())),
        }
    }
}

impl fmt::Display for CorrelationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classified reason the server refused a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    DuplicateEmail,
    MalformedEmail,
    /// Any body shape that is neither of the above
    Unrecognized(String),
}

impl Rejection {
    /// Map a failure body onto a rejection.
    ///
    /// The server reports a duplicate as `{"message": "Duplicate Email"}` and
    /// request validation failures as `{"message": ["email must be an email", ...]}`.
    pub fn classify(body: &Value) -> Self {
        match body.get("message") {
            Some(Value::String(message)) if message == DUPLICATE_EMAIL_MESSAGE => {
                Self::DuplicateEmail
            }
            Some(Value::Array(messages))
                if messages.first().and_then(Value::as_str) == Some(MALFORMED_EMAIL_MESSAGE) =>
            {
                Self::MalformedEmail
            }
            _ => Self::Unrecognized(body.to_string()),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEmail => f.write_str("duplicate email"),
            Self::MalformedEmail => f.write_str("malformed email"),
            Self::Unrecognized(body) => write!(f, "unrecognized body {body}"),
        }
    }
}

/// Failure of a request to the auth endpoints
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request rejected with status {status}: {rejection}")]
    Rejected { status: u16, rejection: Rejection },
    #[error("unexpected response body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected { rejection, .. } => Some(rejection),
            Self::Transport(_) | Self::InvalidBody(_) => None,
        }
    }
}
