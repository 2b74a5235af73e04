//! Utility modules supporting search and citation.
//!
//! - [`normalize`]: turn raw DBLP hits into [`crate::models::Publication`] records
//! - [`bibtex`]: citation key derivation and BibTeX field cleanup
//! - [`cite`]: [`prepare_bibtex`], the copy-to-clipboard pipeline
//! - [`doi`]: DOI validation and extraction from free text
//! - [`validate`]: URL, max-results and access-tag validation
//! - [`HttpClient`] and [`with_retry`]: HTTP plumbing for sources
//!
//! # Preparing a BibTeX entry
//!
//! ```rust
//! use dblp_cite::utils::{prepare_bibtex, CitationOptions};
//!
//! let entry = "@article{DBLP:journals/tse/Smith23,\n  title = {Testing},\n  year = {2023},\n}";
//! let prepared = prepare_bibtex(entry, &CitationOptions::default()).unwrap();
//! assert!(prepared.starts_with("@article{smith2023tse,"));
//! ```
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use dblp_cite::sources::SourceError;
//! use dblp_cite::utils::{with_retry, RetryConfig};
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let config = RetryConfig::default().max_attempts(3);
//! let result = with_retry(config, || fetch_data()).await?;
//! # Ok(())
//! # }
//! ```

pub mod bibtex;
pub mod cite;
pub mod doi;
mod http;
pub mod normalize;
mod retry;
pub mod validate;

pub use bibtex::BibtexError;
pub use cite::{prepare_bibtex, CitationOptions};
pub use doi::{doi_resolver_url, extract_doi, is_valid_doi};
pub use http::{HttpClient, REQUEST_TIMEOUT};
pub use normalize::normalize_hits;
pub use retry::{with_retry, RetryConfig, TransientError};
pub use validate::{
    is_valid_url, parse_max_results, validate_max_results, validate_url, AccessLevel,
    ValidationError,
};
