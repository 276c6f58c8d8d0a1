//! Custom error types shared by the resource services
//!
//! This module defines the failure taxonomy for remote calls and client-side
//! validation, together with the rule that turns a failure into the single
//! human-readable message a service stores on its snapshot.

use thiserror::Error;

/// Custom error type for remote API calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status {
        status: u16,
        url: String,
        /// Message recovered from the response body, if it carried one
        message: Option<String>,
    },

    /// The response body did not match the expected shape
    #[error("invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Build a `Status` error, recovering a display message from the
    /// response body. A plain-text body is used verbatim; a JSON body
    /// contributes its string `message` field; anything else carries no
    /// message.
    pub fn from_status(status: u16, url: String, body: &str) -> Self {
        ApiError::Status {
            status,
            url,
            message: message_from_body(body),
        }
    }

    /// Derive the user-facing message for this failure, in priority order:
    /// the message recovered from the response body, the generic
    /// transport-level description, or the caller's fallback for HTTP
    /// failures that carried nothing usable.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Status { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

fn message_from_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(text)) if !text.is_empty() => Some(text),
        Ok(value) => value
            .get("message")
            .and_then(|message| message.as_str())
            .map(str::to_owned),
        // Not JSON: the body itself is the message.
        Err(_) => Some(body.to_string()),
    }
}

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level validation failures raised before any request is issued
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message recorded for `field`, if any.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// `Err(self)` when any failure was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        for (index, error) in self.errors.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Any failure a service operation reports to its caller
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Type alias for Result with ClientError
pub type ClientResult<T> = Result<T, ClientError>;
