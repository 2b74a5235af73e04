//! Bibliography sources.
//!
//! This module defines the [`Source`] trait a publication search backend
//! implements. [`DblpSource`] talks to the live DBLP API; [`MockSource`]
//! returns canned data for tests and offline demos.
//!
//! # Example
//!
//! ```rust,no_run
//! use dblp_cite::models::SearchQuery;
//! use dblp_cite::sources::{DblpSource, Source};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dblp = DblpSource::new()?;
//! let response = dblp.search(&SearchQuery::new("type systems").max_results(10)).await?;
//! for publication in &response.publications {
//!     println!("{} ({})", publication.title, publication.year);
//! }
//! # Ok(())
//! # }
//! ```

mod dblp;
pub mod mock;

pub use dblp::{bibtex_url_for, DblpSource, DBLP_BASE_URL};
pub use mock::MockSource;

use crate::models::{SearchQuery, SearchResponse};
use async_trait::async_trait;

/// A publication search backend
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Short identifier, e.g. "dblp"
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Search for publications matching the query
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError>;

    /// Fetch the raw BibTeX text behind a `bibtexLink`
    async fn fetch_bibtex(&self, url: &str) -> Result<String, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP 429, with Retry-After seconds when the server sent them
    #[error("Rate limit exceeded")]
    RateLimit(Option<u64>),

    /// Record not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 5xx
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status
    #[error("API error: {0}")]
    Api(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Map a non-success HTTP status to an error
    pub fn from_status(status: reqwest::StatusCode, retry_after: Option<u64>, context: &str) -> Self {
        match status {
            reqwest::StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimit(retry_after),
            reqwest::StatusCode::NOT_FOUND => SourceError::NotFound(context.to_string()),
            s if s.is_server_error() => SourceError::Server {
                status: s.as_u16(),
                message: context.to_string(),
            },
            s => SourceError::Api(format!("{} returned HTTP {}", context, s)),
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Network(format!("request timed out: {}", err))
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            SourceError::from_status(StatusCode::TOO_MANY_REQUESTS, Some(5), "search"),
            SourceError::RateLimit(Some(5))
        ));
        assert!(matches!(
            SourceError::from_status(StatusCode::NOT_FOUND, None, "bibtex"),
            SourceError::NotFound(_)
        ));
        assert!(matches!(
            SourceError::from_status(StatusCode::BAD_GATEWAY, None, "search"),
            SourceError::Server { status: 502, .. }
        ));
        assert!(matches!(
            SourceError::from_status(StatusCode::BAD_REQUEST, None, "search"),
            SourceError::Api(_)
        ));
    }

    #[test]
    fn test_json_error_is_parse_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(SourceError::from(err), SourceError::Parse(_)));
    }
}
