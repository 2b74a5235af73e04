//! Wire shapes of the DBLP publication search API (`format=json`).
//!
//! These mirror the upstream response exactly, quirks included. Nothing
//! outside [`crate::utils::normalize`] and the DBLP source should need them.

use serde::{Deserialize, Serialize};

/// A field that DBLP emits as a bare value when there is one item and as an
/// array when there are several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Collapse either shape into an ordered sequence
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    /// Borrowing iterator over either shape
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item).iter(),
            OneOrMany::Many(items) => items.iter(),
        }
    }
}

/// Top-level search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DblpResponse {
    pub result: DblpResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DblpResult {
    #[serde(default)]
    pub query: Option<String>,
    pub hits: DblpHits,
}

/// Hit counters and the hit list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DblpHits {
    #[serde(rename = "@total", default)]
    pub total: Option<String>,

    #[serde(rename = "@sent", default)]
    pub sent: Option<String>,

    #[serde(rename = "@first", default)]
    pub first: Option<String>,

    /// Absent when the query matched nothing
    #[serde(default)]
    pub hit: Option<Vec<RawHit>>,
}

impl DblpHits {
    /// Total number of matches, 0 when missing or unparsable
    pub fn total_count(&self) -> usize {
        parse_count(self.total.as_deref())
    }

    /// Number of hits in this page, 0 when missing or unparsable
    pub fn sent_count(&self) -> usize {
        parse_count(self.sent.as_deref())
    }
}

fn parse_count(value: Option<&str>) -> usize {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// One search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(rename = "@score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,

    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub info: HitInfo,
}

/// Bibliographic fields of a hit
///
/// Every field is optional: DBLP omits fields freely and the normalizer
/// degrades per field instead of rejecting the hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HitInfo {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(rename = "type", default)]
    pub pub_type: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub authors: Option<RawAuthors>,

    #[serde(default)]
    pub year: Option<String>,

    /// Usually a string; proceedings spanning several venues come as an array
    #[serde(default)]
    pub venue: Option<OneOrMany<String>>,

    #[serde(default)]
    pub volume: Option<String>,

    #[serde(default)]
    pub number: Option<String>,

    #[serde(default)]
    pub pages: Option<String>,

    #[serde(default)]
    pub doi: Option<String>,

    /// Electronic edition links; an array when there are several
    #[serde(default)]
    pub ee: Option<OneOrMany<String>>,

    #[serde(default)]
    pub access: Option<String>,
}

/// The `authors` wrapper object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAuthors {
    pub author: OneOrMany<RawAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAuthor {
    #[serde(rename = "@pid", default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,

    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_author_object() {
        let json = r#"{"author": {"@pid": "1/2", "text": "John Smith 0001"}}"#;
        let authors: RawAuthors = serde_json::from_str(json).unwrap();
        assert!(matches!(authors.author, OneOrMany::One(_)));
        assert_eq!(authors.author.into_vec().len(), 1);
    }

    #[test]
    fn test_author_array() {
        let json = r#"{"author": [{"text": "A"}, {"text": "B"}, {"text": "C"}]}"#;
        let authors: RawAuthors = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = authors.author.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_hits_without_hit_array() {
        let json = r#"{"result": {"hits": {"@total": "0", "@computed": "0", "@sent": "0", "@first": "0"}}}"#;
        let response: DblpResponse = serde_json::from_str(json).unwrap();
        assert!(response.result.hits.hit.is_none());
        assert_eq!(response.result.hits.total_count(), 0);
        assert_eq!(response.result.hits.sent_count(), 0);
    }

    #[test]
    fn test_unparsable_counts_default_to_zero() {
        let hits = DblpHits {
            total: Some("lots".to_string()),
            sent: None,
            ..Default::default()
        };
        assert_eq!(hits.total_count(), 0);
        assert_eq!(hits.sent_count(), 0);
    }

    #[test]
    fn test_venue_array() {
        let json = r#"{"venue": ["ICSE", "ICSE Companion"]}"#;
        let info: HitInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.venue.unwrap().into_vec(), vec!["ICSE", "ICSE Companion"]);
    }

    #[test]
    fn test_ee_string_or_array() {
        let single: HitInfo = serde_json::from_str(r#"{"ee": "https://doi.org/10.1/a"}"#).unwrap();
        assert_eq!(single.ee.unwrap().into_vec(), vec!["https://doi.org/10.1/a"]);

        let several: HitInfo = serde_json::from_str(
            r#"{"ee": ["https://doi.org/10.1/a", "https://arxiv.org/abs/1234.5678"]}"#,
        )
        .unwrap();
        assert_eq!(several.ee.unwrap().into_vec().len(), 2);
    }
}
