//! Logging for requests sent to and responses received from the finance API.

use reqwest::{Method, StatusCode, Url};

/// Response bodies longer than this many bytes are truncated in `debug` logs.
///
/// The full body is still logged at the `trace` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

pub(crate) fn log_request(method: &Method, url: &Url) {
    tracing::debug!("Sending request: {method} {url}");
}

pub(crate) fn log_response(method: &Method, url: &Url, status: StatusCode, body: &[u8]) {
    let body = String::from_utf8_lossy(body);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!(
            "Received response: {method} {url} {status}\nbody: {}...",
            truncate(&body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::trace!("Full response body: {body:?}");
    } else {
        tracing::debug!("Received response: {method} {url} {status}\nbody: {body:?}");
    }

    if !status.is_success() {
        tracing::warn!("{method} {url} failed with status {status}");
    }
}

/// Cut `text` to at most `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    let mut end = limit.min(text.len());

    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}
