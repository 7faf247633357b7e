//! Response body decoding
//!
//! Turns raw response text into either a generic JSON value or the
//! absence-of-body sentinel (`None`). Several endpoints answer a successful
//! write with an empty payload instead of an empty JSON object, so an empty
//! body is success here, not a parse failure.

use citypermit_domain::{CityPermitError, Result};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;

/// Longest slice of an offending body quoted in parse errors.
const EXCERPT_LEN: usize = 80;

/// Decode a response body
///
/// Empty or whitespace-only bodies decode to `None`; anything else must be
/// valid JSON.
///
/// # Errors
///
/// Returns `Parse` with a short excerpt of the body when it is not valid
/// JSON.
pub fn decode_body(text: &str) -> Result<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text).map(Some).map_err(|err| {
        CityPermitError::Parse(format!(
            "response body is not valid JSON ({err}): {:?}",
            excerpt(text)
        ))
    })
}

/// Parse a `Retry-After` header as whole seconds
///
/// Absent or non-integer values (including HTTP-date forms, which this
/// service does not send) yield `None`.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(EXCERPT_LEN) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
