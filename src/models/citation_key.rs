//! Citation key configuration.

use serde::{Deserialize, Serialize};

/// One token of a citation key pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationKeyField {
    /// Surname taken from the DBLP key
    Author,
    /// Year field of the entry
    Year,
    /// Venue segment of the DBLP key
    Venue,
    /// First significant word of the title
    Title,
    /// Literal `-`
    Dash,
    /// Literal `_`
    Underscore,
    /// Unrecognized token; contributes nothing to the key
    #[serde(other)]
    Unknown,
}

impl CitationKeyField {
    /// Parse a token name, mapping anything unrecognized to [`CitationKeyField::Unknown`]
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "author" => CitationKeyField::Author,
            "year" => CitationKeyField::Year,
            "venue" => CitationKeyField::Venue,
            "title" => CitationKeyField::Title,
            "dash" => CitationKeyField::Dash,
            "underscore" => CitationKeyField::Underscore,
            _ => CitationKeyField::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CitationKeyField::Author => "author",
            CitationKeyField::Year => "year",
            CitationKeyField::Venue => "venue",
            CitationKeyField::Title => "title",
            CitationKeyField::Dash => "dash",
            CitationKeyField::Underscore => "underscore",
            CitationKeyField::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CitationKeyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields used when the user has not chosen any
pub fn default_citation_key_fields() -> Vec<CitationKeyField> {
    vec![
        CitationKeyField::Author,
        CitationKeyField::Year,
        CitationKeyField::Venue,
    ]
}

/// How to assemble a citation key
///
/// `fields` is ordered and may repeat tokens. An empty list assembles an
/// empty key; callers that need a key must reject that before rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationKeyConfig {
    pub fields: Vec<CitationKeyField>,

    #[serde(default)]
    pub author_capitalize: bool,

    #[serde(default)]
    pub venue_uppercase: bool,
}

impl CitationKeyConfig {
    pub fn new(fields: Vec<CitationKeyField>) -> Self {
        Self {
            fields,
            author_capitalize: false,
            venue_uppercase: false,
        }
    }

    /// Build from token names such as `["author", "dash", "year"]`
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self::new(
            tokens
                .iter()
                .map(|t| CitationKeyField::from_token(t.as_ref()))
                .collect(),
        )
    }

    pub fn author_capitalize(mut self, value: bool) -> Self {
        self.author_capitalize = value;
        self
    }

    pub fn venue_uppercase(mut self, value: bool) -> Self {
        self.venue_uppercase = value;
        self
    }

    /// Token names joined with `+`, e.g. `author+dash+year`
    pub fn pattern(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl Default for CitationKeyConfig {
    fn default() -> Self {
        Self::new(default_citation_key_fields())
    }
}
