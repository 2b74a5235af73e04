//! Core data models for publications, search and citation keys.

mod citation_key;
mod publication;
pub mod raw;
mod search;

pub use citation_key::{default_citation_key_fields, CitationKeyConfig, CitationKeyField};
pub use publication::{Publication, PublicationType, BIBTEX_LINK_SUFFIX, DOI_NOT_AVAILABLE};
pub use search::{
    NormalizedHits, SearchQuery, SearchResponse, DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT,
};
