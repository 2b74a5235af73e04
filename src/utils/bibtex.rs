//! Citation key derivation and BibTeX field cleanup.
//!
//! DBLP BibTeX is treated as semi-structured text: targeted regular
//! expressions locate the few well-known fields we touch, and an explicit
//! brace counter handles the title, which may contain nested groups such as
//! `{A {Novel} Approach}`. There is no general BibTeX grammar here.
//!
//! Everything in this module is a pure function of its inputs.

use regex::{NoExpand, Regex};
use std::sync::OnceLock;

use crate::models::{CitationKeyConfig, CitationKeyField};

/// Words never used as the title token
pub const TITLE_STOPWORDS: [&str; 6] = ["a", "an", "the", "on", "in", "at"];

/// Errors that abort a citation key rewrite
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BibtexError {
    /// The entry has no `@type{DBLP:class/venue/author,` header
    #[error("no DBLP citation key found in BibTeX entry")]
    MissingCitationKey,

    /// The entry has no `year = {NNNN},` field
    #[error("BibTeX entry is missing the year field")]
    MissingYear,

    /// Key renaming was requested with no key fields configured
    #[error("citation key field list is empty")]
    EmptyKeyFields,
}

macro_rules! static_regex {
    ($name:ident, $pattern:literal) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect(concat!("valid regex: ", $pattern)))
        }
    };
}

static_regex!(entry_key_re, r"^\s*@\S+?\{(DBLP:\S+/\S+/\S+),");
static_regex!(rewrite_key_re, r"DBLP:\S+/\S+/\S+");
static_regex!(digits_re, r"[0-9]+");
static_regex!(trailing_upper_re, r"[A-Z]+$");
static_regex!(year_re, r"year\s*=\s*\{([0-9]+)\},");
static_regex!(title_start_re, r"(?i)\btitle\s*=\s*\{");
static_regex!(latex_command_re, r"\\[a-zA-Z]+\{([^}]*)\}");
static_regex!(brace_backslash_re, r"[{}\\]");
static_regex!(timestamp_re, r"\s*timestamp\s*=\s*\{[^}]*\},\s*");
static_regex!(biburl_re, r"\s*biburl\s*=\s*\{[^}]*\},\s*");
static_regex!(bibsource_re, r"\s*bibsource\s*=\s*\{[^}]*\}[\s,]*");
static_regex!(url_field_re, r"\n\s*url\s*=\s*\{[^}]*\},?");
static_regex!(dangling_comma_re, r",(\s*\})\s*$");
static_regex!(blank_lines_re, r"\n\s*\n");

/// Locate the DBLP citation key (`DBLP:class/venue/author`) in the entry header
pub fn find_dblp_key(data: &str) -> Option<&str> {
    entry_key_re()
        .captures(data)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Surname token derived from a DBLP key
///
/// The third path segment loses its commas, then every digit run, then a
/// trailing run of capitals: `DBLP:conf/icse/SmithAB21` gives `Smith`.
pub fn extract_author_from_key(key: &str) -> String {
    let segment = key.split('/').nth(2).unwrap_or_default().replace(',', "");
    let without_digits = digits_re().replace_all(&segment, "");
    trailing_upper_re()
        .replace(&without_digits, "")
        .into_owned()
}

/// Venue token derived from a DBLP key (its second path segment)
pub fn extract_venue_from_key(key: &str) -> String {
    key.split('/').nth(1).unwrap_or_default().to_string()
}

/// Year from a `year = {NNNN},` field
///
/// The trailing comma is required, so a year that is the last field of the
/// entry is not found.
pub fn extract_year(data: &str) -> Option<String> {
    year_re()
        .captures(data)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Byte index just past the brace closing a group opened before `start`
///
/// Scanning begins at depth 1. Returns `None` when the group never closes.
pub fn find_matching_brace(data: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;

    for (offset, byte) in data.as_bytes().iter().enumerate().skip(start) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// First word that is not a stopword and is longer than two characters,
/// lowercased and reduced to `[a-z0-9]`. Empty when none qualifies.
pub fn first_significant_word<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| w.as_ref().to_lowercase())
        .find(|w| !TITLE_STOPWORDS.contains(&w.as_str()) && w.chars().count() > 2)
        .map(|w| {
            w.chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                .collect()
        })
        .unwrap_or_default()
}

/// Title token: the first significant word of the `title` field
pub fn extract_first_title_word(data: &str) -> String {
    let Some(opening) = title_start_re().find(data) else {
        return String::new();
    };

    let start = opening.end();
    let Some(end) = find_matching_brace(data, start) else {
        return String::new();
    };

    let title = &data[start..end - 1];
    let title = latex_command_re().replace_all(title, "$1");
    let title = brace_backslash_re().replace_all(&title, "");
    let words: Vec<&str> = title.split_whitespace().collect();

    first_significant_word(&words)
}

/// Raw values the key tokens are built from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMaterial {
    pub author: String,
    pub year: String,
    pub venue: String,
    pub title: String,
}

impl KeyMaterial {
    /// Pull key material out of a DBLP BibTeX entry
    pub fn extract(data: &str) -> Result<Self, BibtexError> {
        let key = find_dblp_key(data).ok_or(BibtexError::MissingCitationKey)?;
        let year = extract_year(data).ok_or(BibtexError::MissingYear)?;

        Ok(Self {
            author: extract_author_from_key(key),
            year,
            venue: extract_venue_from_key(key),
            title: extract_first_title_word(data),
        })
    }
}

/// Concatenate the configured tokens into a citation key
///
/// The author is lowercased, then optionally has its first character
/// uppercased. The venue is always case-folded: uppercase when
/// `venue_uppercase` is set, lowercase otherwise.
pub fn build_citation_key(config: &CitationKeyConfig, material: &KeyMaterial) -> String {
    let mut author = material.author.to_lowercase();
    if config.author_capitalize {
        author = capitalize_first(&author);
    }

    let venue = if config.venue_uppercase {
        material.venue.to_uppercase()
    } else {
        material.venue.to_lowercase()
    };

    config
        .fields
        .iter()
        .map(|field| match field {
            CitationKeyField::Author => author.as_str(),
            CitationKeyField::Year => material.year.as_str(),
            CitationKeyField::Venue => venue.as_str(),
            CitationKeyField::Title => material.title.as_str(),
            CitationKeyField::Dash => "-",
            CitationKeyField::Underscore => "_",
            CitationKeyField::Unknown => "",
        })
        .collect()
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace the first DBLP key in the entry with `new_key`
pub fn replace_citation_key(data: &str, new_key: &str) -> Result<String, BibtexError> {
    let re = rewrite_key_re();
    if !re.is_match(data) {
        return Err(BibtexError::MissingCitationKey);
    }

    let replacement = format!("{},", new_key);
    Ok(re.replace(data, NoExpand(&replacement)).into_owned())
}

/// Rewrite the citation key of a DBLP BibTeX entry according to `config`
///
/// Either the whole rewrite succeeds or an error is returned; the input is
/// never partially modified.
pub fn rename_citation_key(data: &str, config: &CitationKeyConfig) -> Result<String, BibtexError> {
    let material = KeyMaterial::extract(data)?;
    let new_key = build_citation_key(config, &material);
    tracing::debug!("Rewriting citation key as '{}' ({})", new_key, config.pattern());
    replace_citation_key(data, &new_key)
}

/// Drop a comma left dangling before the closing brace and collapse blank lines
fn normalize_entry_tail(data: &str) -> String {
    let data = dangling_comma_re().replace(data, "\n}");
    blank_lines_re().replace_all(&data, "\n").into_owned()
}

/// Remove DBLP bookkeeping fields: `timestamp`, `biburl` and `bibsource`
pub fn clean_bibtex_metadata(data: &str) -> String {
    let data = timestamp_re().replace_all(data, "");
    let data = biburl_re().replace_all(&data, "");
    let data = bibsource_re().replace_all(&data, "");
    normalize_entry_tail(&data)
}

/// Remove the `url` field
pub fn remove_url_field(data: &str) -> String {
    let data = url_field_re().replace_all(data, "");
    normalize_entry_tail(&data)
}
