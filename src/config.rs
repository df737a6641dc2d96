// src/config.rs

//! Typed TOML configuration
//!
//! Settings are loaded from a TOML file into plain structs at startup and
//! injected where needed. Sections:
//! - [database] - SQLite database path
//! - [search] - tuning knobs for the candidate scan and result sampling

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database settings
    #[serde(default)]
    pub database: DatabaseSection,

    /// Search tuning
    #[serde(default)]
    pub search: SearchSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "kondate.db".to_string()
}

/// Tuning knobs for the search pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    /// Number of recipes shown per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Candidate pool taken before shuffling down to `page_size`
    #[serde(default = "default_oversample")]
    pub oversample: usize,

    /// Cap on the whole-result candidate pool
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,

    /// Driver batch size for the multi-concept AND scan
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Ceiling on candidates examined across all batches of one call
    #[serde(default = "default_max_scan_candidates")]
    pub max_scan_candidates: usize,

    /// Upper bound of the recipe id space, used for random cursor starts
    #[serde(default = "default_id_space")]
    pub id_space: i64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            oversample: default_oversample(),
            candidate_pool: default_candidate_pool(),
            batch_size: default_batch_size(),
            max_scan_candidates: default_max_scan_candidates(),
            id_space: default_id_space(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_oversample() -> usize {
    20
}

fn default_candidate_pool() -> usize {
    100
}

fn default_batch_size() -> usize {
    1000
}

fn default_max_scan_candidates() -> usize {
    10_000
}

fn default_id_space() -> i64 {
    1_500_000
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::ParseError(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Load configuration from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.path, "kondate.db");
        assert_eq!(config.search.page_size, 10);
        assert_eq!(config.search.oversample, 20);
        assert_eq!(config.search.batch_size, 1000);
        assert_eq!(config.search.max_scan_candidates, 10_000);
    }

    #[test]
    fn test_partial_file_keeps_section_defaults() {
        let toml_str = r#"
            [database]
            path = "/var/lib/kondate/recipes.db"

            [search]
            page_size = 5
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database.path, "/var/lib/kondate/recipes.db");
        assert_eq!(config.search.page_size, 5);
        assert_eq!(config.search.oversample, 20);
    }

    #[test]
    fn test_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.search.id_space, 1_500_000);
    }
}
