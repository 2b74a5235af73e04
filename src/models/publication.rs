//! Publication model representing one normalized DBLP search result.

use serde::{Deserialize, Serialize};

/// BibTeX-style entry type of a publication
///
/// DBLP labels its hits with free-text categories ("Journal Articles", ...);
/// these are the internal types they map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationType {
    Article,
    Inproceedings,
    Editor,
    Incollection,
    Book,
    Misc,
    Refwork,
}

impl PublicationType {
    /// Map a DBLP type label to the internal type.
    ///
    /// Returns `None` for labels outside the known table; this is not an error.
    pub fn from_dblp_label(label: &str) -> Option<Self> {
        match label {
            "Journal Articles" => Some(PublicationType::Article),
            "Conference and Workshop Papers" => Some(PublicationType::Inproceedings),
            "Editorship" => Some(PublicationType::Editor),
            "Parts in Books or Collections" => Some(PublicationType::Incollection),
            "Books and Theses" => Some(PublicationType::Book),
            "Informal and Other Publications" => Some(PublicationType::Misc),
            "Reference Works" => Some(PublicationType::Refwork),
            _ => None,
        }
    }

    /// Returns the identifier used in BibTeX and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationType::Article => "article",
            PublicationType::Inproceedings => "inproceedings",
            PublicationType::Editor => "editor",
            PublicationType::Incollection => "incollection",
            PublicationType::Book => "book",
            PublicationType::Misc => "misc",
            PublicationType::Refwork => "refwork",
        }
    }
}

impl std::fmt::Display for PublicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sentinel stored in [`Publication::doi`] when DBLP has no DOI for the entry
pub const DOI_NOT_AVAILABLE: &str = "N/A";

/// Suffix appended to a permalink to fetch the entry's BibTeX
pub const BIBTEX_LINK_SUFFIX: &str = ".bib?param=1";

/// A publication as shown to the user
///
/// Built fresh from each search response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Entry type, absent when DBLP used an unknown label
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pub_type: Option<PublicationType>,

    /// Title, verbatim from DBLP
    pub title: String,

    /// Canonical DBLP record URL
    pub perma_link: String,

    /// Author display names in upstream order
    pub authors: Vec<String>,

    /// Year, verbatim (not validated as numeric)
    pub year: String,

    /// Venue, with volume/issue appended for journal articles
    pub venue: String,

    /// Page range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,

    /// DOI, or [`DOI_NOT_AVAILABLE`]
    pub doi: String,

    /// Electronic edition URL (usually a doi.org link)
    #[serde(rename = "doiURL", default, skip_serializing_if = "Option::is_none")]
    pub doi_url: Option<String>,

    /// URL of the BibTeX export
    pub bibtex_link: String,

    /// Access tag ("open"/"closed"); see [`crate::utils::AccessLevel`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

impl Publication {
    /// Whether DBLP supplied a DOI for this entry
    pub fn has_doi(&self) -> bool {
        self.doi != DOI_NOT_AVAILABLE
    }

    /// Authors joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}
