//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Publication, PublicationType, SearchQuery, SearchResponse, BIBTEX_LINK_SUFFIX};
use crate::sources::{Source, SourceError};

/// A source that returns predefined responses
#[derive(Debug, Default)]
pub struct MockSource {
    search_response: Mutex<Option<SearchResponse>>,
    bibtex: Mutex<HashMap<String, String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search response to return
    pub fn set_search_response(&self, response: SearchResponse) {
        if let Ok(mut guard) = self.search_response.lock() {
            *guard = Some(response);
        }
    }

    /// Register the BibTeX text served for `url`
    pub fn set_bibtex(&self, url: impl Into<String>, entry: impl Into<String>) {
        if let Ok(mut guard) = self.bibtex.lock() {
            guard.insert(url.into(), entry.into());
        }
    }

    /// Clear all configured responses
    pub fn clear(&self) {
        if let Ok(mut guard) = self.search_response.lock() {
            *guard = None;
        }
        if let Ok(mut guard) = self.bibtex.lock() {
            guard.clear();
        }
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        let guard = self
            .search_response
            .lock()
            .map_err(|_| SourceError::Api("mock source lock poisoned".to_string()))?;

        match &*guard {
            Some(response) => Ok(response.clone()),
            None => Ok(SearchResponse::new(&query.query).offset(query.offset)),
        }
    }

    async fn fetch_bibtex(&self, url: &str) -> Result<String, SourceError> {
        let guard = self
            .bibtex
            .lock()
            .map_err(|_| SourceError::Api("mock source lock poisoned".to_string()))?;

        guard
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(url.to_string()))
    }
}

/// Helper to create a publication for tests
pub fn make_publication(key: &str, title: &str, year: &str) -> Publication {
    let perma_link = format!("https://dblp.org/rec/{}", key);
    Publication {
        pub_type: Some(PublicationType::Article),
        title: title.to_string(),
        bibtex_link: format!("{}{}", perma_link, BIBTEX_LINK_SUFFIX),
        perma_link,
        authors: vec!["Jane Smith".to_string()],
        year: year.to_string(),
        venue: "TSE".to_string(),
        pages: None,
        doi: "N/A".to_string(),
        doi_url: None,
        access: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_search_is_empty() {
        let source = MockSource::new();
        let response = source.search(&SearchQuery::new("anything")).await.unwrap();
        assert_eq!(response.status, "OK");
        assert!(response.publications.is_empty());
    }

    #[tokio::test]
    async fn test_canned_responses() {
        let source = MockSource::new();
        let publication = make_publication("journals/tse/Smith23", "Test Paper", "2023");
        let link = publication.bibtex_link.clone();

        let mut response = SearchResponse::new("test").hits(1, 1);
        response.publications.push(publication);
        source.set_search_response(response);
        source.set_bibtex(&link, "@article{DBLP:journals/tse/Smith23,\n}");

        let found = source.search(&SearchQuery::new("test")).await.unwrap();
        assert_eq!(found.publications.len(), 1);
        assert!(source.fetch_bibtex(&link).await.unwrap().starts_with("@article"));

        source.clear();
        assert!(matches!(
            source.fetch_bibtex(&link).await,
            Err(SourceError::NotFound(_))
        ));
    }
}
