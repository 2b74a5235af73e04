//! # dblp-cite
//!
//! Search the DBLP computer science bibliography and turn its BibTeX
//! exports into ready-to-paste citations with readable keys.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Publication, SearchQuery, citation key config)
//! - [`sources`]: The [`Source`] trait, the live DBLP client and a mock
//! - [`utils`]: Result normalization, citation key rewriting, DOI and input validation
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal rendering for the CLI

pub mod config;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Publication, SearchQuery, SearchResponse};
pub use sources::{DblpSource, Source};
pub use utils::{prepare_bibtex, CitationOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
