//! DBLP source implementation.
//!
//! Uses the DBLP publication search API (`/search/publ/api`, JSON format)
//! and the `.bib` export of record pages.

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use std::sync::Arc;

use crate::models::raw::DblpResponse;
use crate::models::{SearchQuery, SearchResponse, BIBTEX_LINK_SUFFIX};
use crate::sources::{Source, SourceError};
use crate::utils::normalize::normalize_hits;
use crate::utils::{with_retry, HttpClient, RetryConfig};

pub const DBLP_BASE_URL: &str = "https://dblp.org";
const SEARCH_PATH: &str = "/search/publ/api";

/// DBLP publication search source
#[derive(Debug, Clone)]
pub struct DblpSource {
    client: Arc<HttpClient>,
    base_url: String,
    retry: RetryConfig,
}

impl DblpSource {
    pub fn new() -> Result<Self, SourceError> {
        Self::with_base_url(DBLP_BASE_URL)
    }

    /// Point the source at another server, e.g. a mirror or a test double
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        })
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Search endpoint URL for a query
    ///
    /// `h` is clamped to 1..=1000; `f` is only sent past the first page.
    pub fn search_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}{}?q={}&format=json&h={}",
            self.base_url,
            SEARCH_PATH,
            urlencoding::encode(&query.query),
            query.effective_max_results()
        );

        if query.offset > 0 {
            url.push_str(&format!("&f={}", query.offset));
        }

        url
    }

    /// Turn a search response body into a [`SearchResponse`]
    pub fn parse_search_response(
        query: &SearchQuery,
        body: &str,
    ) -> Result<SearchResponse, SourceError> {
        let parsed: DblpResponse = serde_json::from_str(body)?;
        let hits = parsed.result.hits;

        let response = SearchResponse::new(&query.query)
            .hits(hits.total_count(), hits.sent_count())
            .offset(query.offset);

        match hits.hit {
            Some(page) if hits.sent_count() > 0 => {
                Ok(response.normalized(normalize_hits(&page)))
            }
            _ => Ok(response),
        }
    }

    /// GET a URL as text, retrying transient failures
    async fn get_text(&self, url: &str, context: &'static str) -> Result<String, SourceError> {
        let client = Arc::clone(&self.client);

        with_retry(self.retry, || {
            let client = Arc::clone(&client);
            async move {
                let response = client.get(url).send().await?;
                let status = response.status();

                if !status.is_success() {
                    let retry_after = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.trim().parse::<u64>().ok());
                    return Err(SourceError::from_status(status, retry_after, context));
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

/// BibTeX export URL for a record reference
///
/// Accepts a `bibtexLink` (returned unchanged), a record page URL, or a
/// DBLP key with or without the `DBLP:` prefix.
pub fn bibtex_url_for(reference: &str) -> String {
    let reference = reference.trim();

    if reference.starts_with("http://") || reference.starts_with("https://") {
        if reference.contains(".bib") {
            return reference.to_string();
        }
        let page = reference.trim_end_matches(".html");
        return format!("{}{}", page, BIBTEX_LINK_SUFFIX);
    }

    let key = reference.strip_prefix("DBLP:").unwrap_or(reference);
    format!("{}/rec/{}{}", DBLP_BASE_URL, key, BIBTEX_LINK_SUFFIX)
}

#[async_trait]
impl Source for DblpSource {
    fn id(&self) -> &str {
        "dblp"
    }

    fn name(&self) -> &str {
        "DBLP"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        if query.query.trim().is_empty() {
            return Err(SourceError::InvalidRequest("empty search query".to_string()));
        }

        let url = self.search_url(query);
        tracing::debug!("Searching DBLP: {}", url);

        let body = self.get_text(&url, "DBLP search").await?;
        let response = Self::parse_search_response(query, &body)?;

        tracing::info!(
            "DBLP search '{}': {} total, {} sent, {} excluded",
            query.query,
            response.total_hits,
            response.sent_hits,
            response.excluded_count
        );

        Ok(response)
    }

    async fn fetch_bibtex(&self, url: &str) -> Result<String, SourceError> {
        tracing::debug!("Fetching BibTeX: {}", url);
        self.get_text(url, "BibTeX export").await
    }
}
