//! DOI validation and extraction from free text.

use regex::Regex;
use std::sync::OnceLock;

/// Base URL of the DOI resolver
pub const DOI_RESOLVER: &str = "https://doi.org/";

/// URL prefixes stripped before validation, longest first
const DOI_URL_PREFIXES: [&str; 6] = [
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "https://doi.org/",
    "http://doi.org/",
    "dx.doi.org/",
    "doi.org/",
];

fn doi_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Crossref's recommended pattern for modern DOIs
            Regex::new(r"(?i)^10\.\d{4,9}/[-._;()/:A-Z0-9]+$").expect("valid DOI regex"),
            // Wiley SICI-style legacy DOIs
            Regex::new(r"(?i)^10\.1002/\S+$").expect("valid legacy DOI regex"),
        ]
    })
}

fn doi_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^doi:\s*").expect("valid doi label regex"))
}

/// Whether `doi` is a bare DOI such as `10.1000/xyz123`
pub fn is_valid_doi(doi: &str) -> bool {
    doi_patterns().iter().any(|re| re.is_match(doi))
}

/// Strip a doi.org / dx.doi.org URL prefix, ignoring case
pub fn remove_doi_url_prefix(text: &str) -> &str {
    let lower = text.to_ascii_lowercase();

    DOI_URL_PREFIXES
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .map(|prefix| &text[prefix.len()..])
        .unwrap_or(text)
}

/// Cut a trailing `?query` or `#fragment` that looks like URL syntax
///
/// `?` and `#` are legal inside DOIs, so a suffix is only dropped when the
/// segment after the marker contains `=` or `&`.
fn strip_url_query(text: &str) -> &str {
    for (idx, ch) in text.char_indices() {
        if ch != '?' && ch != '#' {
            continue;
        }

        let rest = &text[idx + 1..];
        let segment = rest.split(['?', '#']).next().unwrap_or_default();
        if segment.contains(['=', '&']) {
            return &text[..idx];
        }
    }

    text
}

/// Extract a DOI from selected text such as `https://doi.org/10.1000/xyz.`
///
/// Returns `None` when nothing valid remains after cleanup.
pub fn extract_doi(text: &str) -> Option<String> {
    let cleaned = remove_doi_url_prefix(text.trim());
    let cleaned = doi_label_re().replace(cleaned, "");
    let cleaned = strip_url_query(&cleaned)
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | '\'' | '"') || c.is_whitespace());

    if cleaned.is_empty() || !is_valid_doi(cleaned) {
        return None;
    }

    Some(cleaned.to_string())
}

/// Resolver URL for a DOI
pub fn doi_resolver_url(doi: &str) -> String {
    format!("{}{}", DOI_RESOLVER, urlencoding::encode(doi))
}
