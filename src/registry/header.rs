//! Parsing of `RateLimit-*` header values.
//!
//! Docker Hub appends a window descriptor to the count, e.g. `100;w=21600`.
//! Only the leading count is kept.

use crate::error::{Error, Result};

const WINDOW_SEPARATOR: char = ';';

/// Parses a raw rate-limit header value into a request count.
///
/// An empty value (header absent) yields 0. Anything after the first `;` is
/// ignored, the part before it must be a base-10 unsigned integer.
pub fn parse_limit(raw: &str) -> Result<u64> {
    if raw.is_empty() {
        return Ok(0);
    }

    let count = match raw.split_once(WINDOW_SEPARATOR) {
        Some((count, _window)) => count,
        None => raw,
    };

    count.parse::<u64>().map_err(|source| Error::Parse {
        value: raw.to_string(),
        source,
    })
}
