//! Preparing a fetched DBLP BibTeX entry for the clipboard.
//!
//! Key renaming, metadata stripping and URL stripping are independent
//! toggles applied in that order. A failed rewrite returns an error and no
//! text at all.

use serde::{Deserialize, Serialize};

use crate::models::CitationKeyConfig;
use crate::utils::bibtex::{
    clean_bibtex_metadata, remove_url_field, rename_citation_key, BibtexError,
};

/// What to do with a BibTeX entry before handing it to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationOptions {
    /// Replace the DBLP key with one built from `key`
    pub key_renaming: bool,

    pub key: CitationKeyConfig,

    /// Drop `timestamp`, `biburl` and `bibsource`
    pub remove_metadata: bool,

    /// Drop the `url` field
    pub remove_url: bool,
}

impl Default for CitationOptions {
    fn default() -> Self {
        Self {
            key_renaming: true,
            key: CitationKeyConfig::default(),
            remove_metadata: true,
            remove_url: false,
        }
    }
}

impl CitationOptions {
    /// Options that leave the entry untouched
    pub fn verbatim() -> Self {
        Self {
            key_renaming: false,
            key: CitationKeyConfig::default(),
            remove_metadata: false,
            remove_url: false,
        }
    }
}

/// Apply the configured transformations to a BibTeX entry
pub fn prepare_bibtex(data: &str, options: &CitationOptions) -> Result<String, BibtexError> {
    let mut output = if options.key_renaming {
        if options.key.fields.is_empty() {
            return Err(BibtexError::EmptyKeyFields);
        }
        rename_citation_key(data, &options.key).inspect_err(|e| {
            tracing::warn!("Citation key rewrite failed: {}", e);
        })?
    } else {
        data.to_string()
    };

    if options.remove_metadata {
        output = clean_bibtex_metadata(&output);
    }

    if options.remove_url {
        output = remove_url_field(&output);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = "@inproceedings{DBLP:conf/icse/Smith0001X22,
  author       = {Jane Smith and
                  Bob Jones},
  title        = {On the Testing of Compilers},
  booktitle    = {{ICSE}},
  pages        = {100--110},
  publisher    = {{ACM}},
  year         = {2022},
  url          = {https://doi.org/10.1145/1234567},
  doi          = {10.1145/1234567},
  timestamp    = {Tue, 05 Jul 2022 10:00:00 +0200},
  biburl       = {https://dblp.org/rec/conf/icse/Smith0001X22.bib},
  bibsource    = {dblp computer science bibliography, https://dblp.org}
}
";

    #[test]
    fn test_default_options() {
        let output = prepare_bibtex(ENTRY, &CitationOptions::default()).unwrap();
        assert!(output.starts_with("@inproceedings{smith2022icse,"));
        assert!(!output.contains("timestamp"));
        assert!(!output.contains("biburl"));
        assert!(!output.contains("bibsource"));
        assert!(output.contains("url          = {https://doi.org/10.1145/1234567}"));
    }

    #[test]
    fn test_title_token_and_separators() {
        let options = CitationOptions {
            key: CitationKeyConfig::from_tokens(&["author", "underscore", "title", "dash", "year"])
                .author_capitalize(true),
            ..Default::default()
        };
        let output = prepare_bibtex(ENTRY, &options).unwrap();
        assert!(output.starts_with("@inproceedings{Smith_testing-2022,"));
    }

    #[test]
    fn test_all_toggles_off_is_identity() {
        let output = prepare_bibtex(ENTRY, &CitationOptions::verbatim()).unwrap();
        assert_eq!(output, ENTRY);
    }

    #[test]
    fn test_remove_url_only() {
        let options = CitationOptions {
            key_renaming: false,
            remove_metadata: false,
            remove_url: true,
            ..Default::default()
        };
        let output = prepare_bibtex(ENTRY, &options).unwrap();
        assert!(output.starts_with("@inproceedings{DBLP:conf/icse/Smith0001X22,"));
        assert!(!output.contains("url          ="));
        assert!(output.contains("biburl"));
    }

    #[test]
    fn test_empty_key_fields_rejected() {
        let options = CitationOptions {
            key: CitationKeyConfig::new(Vec::new()),
            ..Default::default()
        };
        assert_eq!(
            prepare_bibtex(ENTRY, &options),
            Err(BibtexError::EmptyKeyFields)
        );
    }

    #[test]
    fn test_missing_key_fails_without_partial_output() {
        let entry = "@article{smith2022,\n  year = {2022},\n  timestamp = {x},\n}";
        assert_eq!(
            prepare_bibtex(entry, &CitationOptions::default()),
            Err(BibtexError::MissingCitationKey)
        );
    }

    #[test]
    fn test_missing_year_fails() {
        let entry = "@article{DBLP:journals/tse/Smith22,\n  title = {Test}\n}";
        assert_eq!(
            prepare_bibtex(entry, &CitationOptions::default()),
            Err(BibtexError::MissingYear)
        );
    }

    #[test]
    fn test_non_dblp_entry_ok_without_renaming() {
        let entry = "@article{mykey,\n  year = {2022},\n  timestamp = {x},\n}";
        let options = CitationOptions {
            key_renaming: false,
            ..Default::default()
        };
        let output = prepare_bibtex(entry, &options).unwrap();
        assert_eq!(output, "@article{mykey,\n  year = {2022}\n}");
    }
}
