//! Configuration management.
//!
//! Options are read from an optional TOML file and then from environment
//! variables prefixed with `DBLP_CITE_` (e.g. `DBLP_CITE_MAX_RESULTS=50`,
//! `DBLP_CITE_CITATION_KEY_FIELDS=author,dash,year`). Command-line flags are
//! applied on top by the binary.

mod file_config;

pub use file_config::{find_config_file, ConfigFile, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{
    default_citation_key_fields, CitationKeyConfig, CitationKeyField, SearchQuery,
    DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT,
};
use crate::utils::CitationOptions;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DBLP_CITE";

/// User options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Results per search page
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Rewrite the DBLP citation key when preparing BibTeX
    #[serde(default = "default_true")]
    pub key_renaming: bool,

    /// Ordered citation key tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_key_fields: Option<Vec<CitationKeyField>>,

    #[serde(default)]
    pub author_capitalize: bool,

    #[serde(default)]
    pub venue_uppercase: bool,

    /// Strip `timestamp`, `biburl` and `bibsource`
    #[serde(default = "default_true")]
    pub remove_timestamp_biburl_bibsource: bool,

    /// Strip the `url` field
    #[serde(default)]
    pub remove_url: bool,

    /// Dash-separated key pattern from older configurations, e.g.
    /// `author-year-venue`. Only read when `citation_key_fields` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_key_pattern: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            key_renaming: true,
            citation_key_fields: Some(default_citation_key_fields()),
            author_capitalize: false,
            venue_uppercase: false,
            remove_timestamp_biburl_bibsource: true,
            remove_url: false,
            citation_key_pattern: None,
        }
    }
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Citation key tokens, migrating the legacy pattern when needed
    pub fn key_fields(&self) -> Vec<CitationKeyField> {
        match (&self.citation_key_fields, &self.citation_key_pattern) {
            (Some(fields), _) => fields.clone(),
            (None, Some(pattern)) if !pattern.trim().is_empty() => pattern
                .split('-')
                .map(CitationKeyField::from_token)
                .collect(),
            _ => default_citation_key_fields(),
        }
    }

    pub fn citation_key_config(&self) -> CitationKeyConfig {
        CitationKeyConfig::new(self.key_fields())
            .author_capitalize(self.author_capitalize)
            .venue_uppercase(self.venue_uppercase)
    }

    pub fn citation_options(&self) -> CitationOptions {
        CitationOptions {
            key_renaming: self.key_renaming,
            key: self.citation_key_config(),
            remove_metadata: self.remove_timestamp_biburl_bibsource,
            remove_url: self.remove_url,
        }
    }

    /// A first-page query using the configured page size
    pub fn search_query(&self, query: impl Into<String>) -> SearchQuery {
        SearchQuery::new(query).max_results(self.max_results)
    }

    /// Reject option combinations that cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(ConfigError::InvalidMaxResults(self.max_results));
        }

        if self.key_renaming && self.key_fields().is_empty() {
            return Err(ConfigError::EmptyCitationKeyFields);
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Max results must be between 1 and 1000, got {0}")]
    InvalidMaxResults(usize),

    #[error("Key renaming is enabled but no citation key fields are selected")]
    EmptyCitationKeyFields,

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("citation_key_fields")
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        tracing::debug!("Loading configuration from {}", path.display());
        builder = builder.add_source(config::File::from(path));
    }

    let config: Config = builder.add_source(env_source()).build()?.try_deserialize()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_results, 30);
        assert!(config.key_renaming);
        assert!(config.remove_timestamp_biburl_bibsource);
        assert!(!config.remove_url);
        assert_eq!(config.citation_key_config().pattern(), "author+year+venue");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_legacy_pattern_migration() {
        let config = Config {
            citation_key_fields: None,
            citation_key_pattern: Some("author-year-title".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.key_fields(),
            vec![
                CitationKeyField::Author,
                CitationKeyField::Year,
                CitationKeyField::Title
            ]
        );
    }

    #[test]
    fn test_explicit_fields_win_over_pattern() {
        let config = Config {
            citation_key_fields: Some(vec![CitationKeyField::Venue]),
            citation_key_pattern: Some("author-year".to_string()),
            ..Default::default()
        };
        assert_eq!(config.key_fields(), vec![CitationKeyField::Venue]);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config = Config {
            citation_key_fields: None,
            ..Default::default()
        };
        assert_eq!(config.key_fields(), default_citation_key_fields());
    }

    #[test]
    fn test_validate_empty_fields() {
        let config = Config {
            citation_key_fields: Some(Vec::new()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyCitationKeyFields)
        ));

        let config = Config {
            key_renaming: false,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_results() {
        for bad in [0, 1001] {
            let config = Config {
                max_results: bad,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidMaxResults(v)) if v == bad
            ));
        }
    }

    #[test]
    fn test_citation_options() {
        let config = Config {
            key_renaming: false,
            author_capitalize: true,
            remove_url: true,
            ..Default::default()
        };
        let options = config.citation_options();
        assert!(!options.key_renaming);
        assert!(options.key.author_capitalize);
        assert!(options.remove_metadata);
        assert!(options.remove_url);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dblp-cite.toml");
        std::fs::write(
            &path,
            r#"
max_results = 50
citation_key_fields = ["author", "dash", "year"]
venue_uppercase = true
remove_url = true
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.max_results, 50);
        assert!(config.key_renaming);
        assert!(config.venue_uppercase);
        assert!(config.remove_url);
        assert_eq!(config.citation_key_config().pattern(), "author+dash+year");
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dblp-cite.toml");
        std::fs::write(&path, "max_results = 5000\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::InvalidMaxResults(5000))
        ));
    }
}
