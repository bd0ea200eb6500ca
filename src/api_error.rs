//! The normalised error returned by every call to the finance API.

use std::fmt::Display;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// The message used when neither the server nor the transport gave a better one.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Where a failed API call went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The request never got a response, e.g. the server is unreachable or
    /// the connection timed out.
    Network,
    /// The server responded with a non-2xx status.
    Rejected,
    /// The server responded with a 2xx status but the body could not be
    /// decoded.
    MalformedResponse,
    /// The request could not be built, e.g. the path does not form a valid
    /// URL. It was never sent.
    InvalidRequest,
}

/// A failed API call.
///
/// Every transport or server failure is converted into this shape at the
/// HTTP client boundary, so callers only ever have to match on one type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// The HTTP status code. Failures without a response use 500.
    pub status: u16,
    /// A human-readable description, supplied by the server when possible.
    pub message: String,
    /// Field-level error messages, empty if the server sent none.
    pub errors: Vec<String>,
    /// Where the call went wrong.
    pub kind: ApiErrorKind,
}

/// The error body the finance API sends with non-2xx responses.
///
/// `errors` is usually a list of strings, but validation failures from some
/// deployments send an object mapping field names to lists of messages.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    title: Option<String>,
    errors: Option<Value>,
}

impl ApiError {
    /// Create an error for a request that never received a response.
    pub fn network(error: impl Display) -> Self {
        let message = error.to_string();

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: if message.is_empty() {
                FALLBACK_MESSAGE.to_owned()
            } else {
                message
            },
            errors: Vec::new(),
            kind: ApiErrorKind::Network,
        }
    }

    /// Create an error from a non-2xx response and its raw body.
    ///
    /// The server's `message` and `errors` are used if the body is JSON,
    /// otherwise the message falls back to a generic description of the
    /// status code.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorBody>(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|body| body.message.clone().or_else(|| body.title.clone()))
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

        let errors = parsed
            .and_then(|body| body.errors)
            .map(flatten_errors)
            .unwrap_or_default();

        Self {
            status: status.as_u16(),
            message,
            errors,
            kind: ApiErrorKind::Rejected,
        }
    }

    /// Create an error for a 2xx response whose body could not be decoded.
    pub fn malformed(status: StatusCode, error: impl Display) -> Self {
        Self {
            status: status.as_u16(),
            message: format!("Could not read the server response: {error}"),
            errors: Vec::new(),
            kind: ApiErrorKind::MalformedResponse,
        }
    }

    /// Create an error for a request that could not be built and was never sent.
    pub fn invalid_request(error: impl Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: format!("Could not build the request: {error}"),
            errors: Vec::new(),
            kind: ApiErrorKind::InvalidRequest,
        }
    }

    /// Whether the server rejected the request because it conflicts with
    /// existing data, e.g. deleting a category that is still in use.
    pub fn is_conflict(&self) -> bool {
        self.kind == ApiErrorKind::Rejected && self.status == StatusCode::CONFLICT.as_u16()
    }

    /// Whether the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::Rejected && self.status == StatusCode::NOT_FOUND.as_u16()
    }

    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self.kind {
            ApiErrorKind::Network => true,
            ApiErrorKind::Rejected => self.status >= 500,
            ApiErrorKind::MalformedResponse | ApiErrorKind::InvalidRequest => false,
        }
    }
}

fn flatten_errors(errors: Value) -> Vec<String> {
    match errors {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(message) => Some(message),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::Object(fields) => fields
            .into_iter()
            .flat_map(|(field, messages)| {
                flatten_errors(messages)
                    .into_iter()
                    .map(move |message| format!("{field}: {message}"))
            })
            .collect(),
        Value::String(message) => vec![message],
        _ => Vec::new(),
    }
}
