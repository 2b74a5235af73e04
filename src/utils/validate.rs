//! Input validation for URLs, user-configurable values and upstream tags.
//!
//! Values coming back from DBLP (links, access tags) are not trusted as-is
//! before they are rendered or turned into paths.

use thiserror::Error;

use crate::models::{DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT};

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid DOI: {0}")]
    InvalidDoi(String),

    #[error("Invalid max results: {0} (expected 1-1000)")]
    InvalidMaxResults(String),
}

/// Validate a URL, allowing only the `http` and `https` schemes
///
/// Returns the trimmed URL on success.
pub fn validate_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::InvalidUrl("empty URL".to_string()));
    }

    let parsed = url::Url::parse(url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(url.to_string()),
        scheme => Err(ValidationError::InvalidUrl(format!(
            "invalid scheme: {}",
            scheme
        ))),
    }
}

/// Convenience wrapper around [`validate_url`]
pub fn is_valid_url(url: &str) -> bool {
    validate_url(url).is_ok()
}

/// Parse a leading integer the lenient way form inputs are read:
/// surrounding whitespace is ignored, as is anything after the digits.
fn parse_leading_int(input: &str) -> Option<i64> {
    let input = input.trim_start();
    let (sign, digits) = match input.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, input.strip_prefix('+').unwrap_or(input)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

/// Validate a max-results input
///
/// Returns whether the value is acceptable together with the value to use,
/// which falls back to the default page size when invalid.
pub fn validate_max_results(input: &str) -> (bool, usize) {
    match parse_leading_int(input) {
        Some(value) if (1..=MAX_RESULTS_LIMIT as i64).contains(&value) => (true, value as usize),
        _ => (false, DEFAULT_MAX_RESULTS),
    }
}

/// Strict variant of [`validate_max_results`] for command-line arguments
///
/// The whole (trimmed) input must be digits; trailing text is rejected.
pub fn parse_max_results(input: &str) -> Result<usize, ValidationError> {
    let digits = input.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidMaxResults(input.to_string()));
    }

    match validate_max_results(digits) {
        (true, value) => Ok(value),
        (false, _) => Err(ValidationError::InvalidMaxResults(input.to_string())),
    }
}

/// Access tag of a publication, whitelisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Open,
    Closed,
    Unknown,
}

impl AccessLevel {
    /// Map an upstream tag; anything but `open` or `closed` is `Unknown`
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("open") => AccessLevel::Open,
            Some("closed") => AccessLevel::Closed,
            _ => AccessLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Open => "open",
            AccessLevel::Closed => "closed",
            AccessLevel::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
