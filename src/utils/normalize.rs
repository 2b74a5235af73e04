//! Normalization of raw DBLP hits into [`Publication`] records.
//!
//! Pure functions only: no I/O, no shared state. Malformed hits degrade per
//! field (missing strings become empty, missing authors an empty list)
//! instead of failing the whole page.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::raw::{HitInfo, RawAuthors, RawHit};
use crate::models::{
    NormalizedHits, Publication, PublicationType, BIBTEX_LINK_SUFFIX, DOI_NOT_AVAILABLE,
};

/// Substring identifying arXiv mirror records (CoRR abs entries) in DBLP keys
pub const EXCLUDED_KEY_MARKER: &str = "corr/abs-";

/// DBLP's homonym disambiguation suffix, e.g. "Wei Wang 0001"
fn homonym_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" 000\d+$").expect("valid homonym suffix regex"))
}

/// Normalize a page of hits, dropping excluded entries
pub fn normalize_hits(hits: &[RawHit]) -> NormalizedHits {
    let mut publications = Vec::with_capacity(hits.len());
    let mut excluded_count = 0;

    for hit in hits {
        let info = &hit.info;

        if is_excluded(info) {
            excluded_count += 1;
            continue;
        }

        publications.push(create_publication(info));
    }

    if excluded_count > 0 {
        tracing::debug!(
            "Excluded {} CoRR abs entries out of {} hits",
            excluded_count,
            hits.len()
        );
    }

    NormalizedHits {
        publications,
        excluded_count,
    }
}

/// Whether a hit is an arXiv mirror record
pub fn is_excluded(info: &HitInfo) -> bool {
    info.key
        .as_deref()
        .is_some_and(|key| key.contains(EXCLUDED_KEY_MARKER))
}

/// Author names in upstream order, homonym suffixes removed
///
/// A single author object and an author array produce the same shape.
pub fn extract_authors(authors: Option<&RawAuthors>) -> Vec<String> {
    authors
        .map(|a| {
            a.author
                .iter()
                .map(|author| strip_homonym_suffix(&author.text))
                .collect()
        })
        .unwrap_or_default()
}

/// Remove a trailing " 000N" disambiguation suffix from an author name
pub fn strip_homonym_suffix(name: &str) -> String {
    homonym_suffix_re().replace(name, "").into_owned()
}

/// Venue string, with volume and issue appended for journal articles only
pub fn construct_venue(info: &HitInfo) -> String {
    let mut venue = info
        .venue
        .as_ref()
        .map(|v| v.iter().cloned().collect::<Vec<_>>().join(", "))
        .unwrap_or_default();

    let pub_type = info
        .pub_type
        .as_deref()
        .and_then(PublicationType::from_dblp_label);

    if pub_type == Some(PublicationType::Article) {
        if let Some(volume) = &info.volume {
            venue.push(' ');
            venue.push_str(volume);
        }
        if let Some(number) = &info.number {
            venue.push('(');
            venue.push_str(number);
            venue.push(')');
        }
    }

    venue
}

/// Assemble a publication record from a (non-excluded) hit
pub fn create_publication(info: &HitInfo) -> Publication {
    let perma_link = info.url.clone().unwrap_or_default();
    let doi = info
        .doi
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(DOI_NOT_AVAILABLE)
        .to_string();

    Publication {
        pub_type: info
            .pub_type
            .as_deref()
            .and_then(PublicationType::from_dblp_label),
        title: info.title.clone().unwrap_or_default(),
        bibtex_link: format!("{}{}", perma_link, BIBTEX_LINK_SUFFIX),
        perma_link,
        authors: extract_authors(info.authors.as_ref()),
        year: info.year.clone().unwrap_or_default(),
        venue: construct_venue(info),
        pages: info.pages.clone(),
        doi,
        doi_url: info.ee.as_ref().and_then(|ee| ee.iter().next().cloned()),
        access: info.access.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::raw::{OneOrMany, RawAuthor};

    fn info_from_json(json: &str) -> HitInfo {
        serde_json::from_str(json).unwrap()
    }

    fn hit_with_key(key: &str) -> RawHit {
        RawHit {
            score: None,
            id: None,
            info: HitInfo {
                key: Some(key.to_string()),
                title: Some(format!("Title of {}", key)),
                url: Some(format!("https://dblp.org/rec/{}", key)),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let info = info_from_json(
            r#"{
                "key": "journals/tse/Smith23",
                "type": "Journal Articles",
                "title": "Test Paper",
                "url": "https://dblp.org/rec/journals/tse/Smith23",
                "authors": {"author": {"text": "John Smith"}},
                "year": "2023",
                "venue": "TSE",
                "doi": "10.1000/xyz",
                "ee": "https://doi.org/10.1000/xyz",
                "access": "open"
            }"#,
        );

        let publication = create_publication(&info);

        assert_eq!(publication.pub_type, Some(PublicationType::Article));
        assert_eq!(publication.title, "Test Paper");
        assert_eq!(publication.perma_link, "https://dblp.org/rec/journals/tse/Smith23");
        assert_eq!(publication.authors, vec!["John Smith"]);
        assert_eq!(publication.year, "2023");
        assert_eq!(publication.venue, "TSE");
        assert_eq!(publication.pages, None);
        assert_eq!(publication.doi, "10.1000/xyz");
        assert_eq!(publication.doi_url.as_deref(), Some("https://doi.org/10.1000/xyz"));
        assert_eq!(
            publication.bibtex_link,
            "https://dblp.org/rec/journals/tse/Smith23.bib?param=1"
        );
        assert_eq!(publication.access.as_deref(), Some("open"));
    }

    #[test]
    fn test_exclusion_counts_corr_abs_entries() {
        let hits = vec![
            hit_with_key("journals/corr/abs-2301-00001"),
            hit_with_key("conf/icse/Smith23"),
            hit_with_key("journals/corr/abs-2301-00002"),
            hit_with_key("journals/corr/Smith15"),
        ];

        let result = normalize_hits(&hits);

        assert_eq!(result.excluded_count, 2);
        assert_eq!(result.publications.len(), 2);
        assert_eq!(result.publications[0].title, "Title of conf/icse/Smith23");
        // CoRR entries without the abs- marker are genuine records
        assert_eq!(result.publications[1].title, "Title of journals/corr/Smith15");
    }

    #[test]
    fn test_all_excluded() {
        let hits = vec![
            hit_with_key("journals/corr/abs-1"),
            hit_with_key("journals/corr/abs-2"),
        ];
        let result = normalize_hits(&hits);
        assert!(result.publications.is_empty());
        assert_eq!(result.excluded_count, 2);
    }

    #[test]
    fn test_empty_input() {
        let result = normalize_hits(&[]);
        assert_eq!(result, NormalizedHits::default());
    }

    #[test]
    fn test_single_and_array_authors_same_shape() {
        let single = RawAuthors {
            author: OneOrMany::One(RawAuthor {
                pid: None,
                text: "X 0001".to_string(),
            }),
        };
        assert_eq!(extract_authors(Some(&single)), vec!["X"]);

        let many = RawAuthors {
            author: OneOrMany::Many(vec![
                RawAuthor {
                    pid: None,
                    text: "X 0001".to_string(),
                },
                RawAuthor {
                    pid: None,
                    text: "Y".to_string(),
                },
            ]),
        };
        assert_eq!(extract_authors(Some(&many)), vec!["X", "Y"]);
    }

    #[test]
    fn test_homonym_suffix_only_stripped_at_end() {
        assert_eq!(strip_homonym_suffix("Wei Wang 0001"), "Wei Wang");
        assert_eq!(strip_homonym_suffix("Wei Wang 00012"), "Wei Wang");
        // Only " 000" followed by digits counts as a suffix
        assert_eq!(strip_homonym_suffix("Wei Wang 0012"), "Wei Wang 0012");
        assert_eq!(strip_homonym_suffix("Wei 0001 Wang"), "Wei 0001 Wang");
        assert_eq!(strip_homonym_suffix("Agent 007"), "Agent 007");
        assert_eq!(strip_homonym_suffix("Jane Doe"), "Jane Doe");
    }

    #[test]
    fn test_missing_authors_degrade_to_empty() {
        assert!(extract_authors(None).is_empty());
    }

    #[test]
    fn test_venue_augmented_for_articles_only() {
        let article = info_from_json(
            r#"{"type": "Journal Articles", "venue": "TSE", "volume": "42", "number": "3"}"#,
        );
        assert_eq!(construct_venue(&article), "TSE 42(3)");

        let book = info_from_json(
            r#"{"type": "Books and Theses", "venue": "TSE", "volume": "42", "number": "3"}"#,
        );
        assert_eq!(construct_venue(&book), "TSE");
    }

    #[test]
    fn test_venue_partial_volume_number() {
        let volume_only =
            info_from_json(r#"{"type": "Journal Articles", "venue": "CACM", "volume": "66"}"#);
        assert_eq!(construct_venue(&volume_only), "CACM 66");

        let number_only =
            info_from_json(r#"{"type": "Journal Articles", "venue": "CACM", "number": "4"}"#);
        assert_eq!(construct_venue(&number_only), "CACM(4)");

        let neither = info_from_json(r#"{"type": "Journal Articles", "venue": "CACM"}"#);
        assert_eq!(construct_venue(&neither), "CACM");
    }

    #[test]
    fn test_doi_sentinel() {
        let missing = info_from_json(r#"{"url": "https://dblp.org/rec/x"}"#);
        assert_eq!(create_publication(&missing).doi, "N/A");

        let empty = info_from_json(r#"{"url": "https://dblp.org/rec/x", "doi": ""}"#);
        assert_eq!(create_publication(&empty).doi, "N/A");
    }

    #[test]
    fn test_unknown_type_and_missing_fields() {
        let info = info_from_json(r#"{"type": "Data and Artifacts", "url": "https://dblp.org/rec/d/x"}"#);
        let publication = create_publication(&info);
        assert_eq!(publication.pub_type, None);
        assert!(publication.title.is_empty());
        assert!(publication.authors.is_empty());
        assert_eq!(publication.doi_url, None);
        assert_eq!(publication.pages, None);
        assert_eq!(publication.bibtex_link, "https://dblp.org/rec/d/x.bib?param=1");
    }

    #[test]
    fn test_missing_key_is_not_excluded() {
        let info = HitInfo::default();
        assert!(!is_excluded(&info));
    }

    #[test]
    fn test_first_electronic_edition_used() {
        let info = info_from_json(
            r#"{
                "type": "Journal Articles",
                "url": "https://dblp.org/rec/journals/tse/Smith23",
                "ee": ["https://doi.org/10.1000/xyz", "https://arxiv.org/abs/2301.00001"]
            }"#,
        );
        assert_eq!(
            create_publication(&info).doi_url.as_deref(),
            Some("https://doi.org/10.1000/xyz")
        );
    }
}
