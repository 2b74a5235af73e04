//! Search request and response models.

use serde::{Deserialize, Serialize};

use crate::models::Publication;

/// Default page size
pub const DEFAULT_MAX_RESULTS: usize = 30;

/// Largest page size DBLP accepts
pub const MAX_RESULTS_LIMIT: usize = 1000;

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Main search query string
    pub query: String,

    /// Maximum number of results per page
    pub max_results: usize,

    /// Index of the first hit to return (DBLP's `f` parameter)
    pub offset: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
            offset: 0,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set pagination offset
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Page size actually sent upstream, clamped to `1..=1000`
    pub fn effective_max_results(&self) -> usize {
        self.max_results.clamp(1, MAX_RESULTS_LIMIT)
    }

    /// The query for the following page
    pub fn next_page(&self) -> Self {
        Self {
            offset: self.offset + self.effective_max_results(),
            ..self.clone()
        }
    }

    /// The query for the preceding page, never before the first hit
    pub fn previous_page(&self) -> Self {
        Self {
            offset: self.offset.saturating_sub(self.effective_max_results()),
            ..self.clone()
        }
    }
}

/// Output of the result normalizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedHits {
    /// Kept publications in upstream order
    pub publications: Vec<Publication>,

    /// Number of hits dropped by the exclusion rule
    pub excluded_count: usize,
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Request status as shown to the user ("OK" on success)
    pub status: String,

    /// The query that produced this response
    pub query: String,

    /// Total number of matches upstream
    pub total_hits: usize,

    /// Number of hits upstream sent for this page
    pub sent_hits: usize,

    /// Number of hits dropped by the exclusion rule
    pub excluded_count: usize,

    /// Offset this page starts at
    pub offset: usize,

    /// Normalized publications
    pub publications: Vec<Publication>,
}

impl SearchResponse {
    /// Create an empty, successful response
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            status: "OK".to_string(),
            query: query.into(),
            total_hits: 0,
            sent_hits: 0,
            excluded_count: 0,
            offset: 0,
            publications: Vec::new(),
        }
    }

    /// Set hit counters
    pub fn hits(mut self, total: usize, sent: usize) -> Self {
        self.total_hits = total;
        self.sent_hits = sent;
        self
    }

    /// Set offset
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Attach normalizer output
    pub fn normalized(mut self, normalized: NormalizedHits) -> Self {
        self.publications = normalized.publications;
        self.excluded_count = normalized.excluded_count;
        self
    }

    /// Whether more hits exist past this page
    pub fn has_more(&self) -> bool {
        self.offset + self.sent_hits < self.total_hits
    }
}
