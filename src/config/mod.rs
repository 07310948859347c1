//! Configuration Module
//! Loads the YAML document holding archive paths, category lists and column aliases.

use crate::data::ColumnMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Names of the category lists consumed by the queries.
pub mod keys {
    pub const CAR_BODY_STYLES: &str = "car_body_styles";
    pub const NO_AIRBAG: &str = "no_airbag";
    pub const VALID_LICENSE_TYPES: &str = "valid_license_types";
    pub const ALCOHOL_CONTRIB_FACTR: &str = "alcohol_contrib_factr";
    pub const DAMAGE_MORE_THAN_FOUR: &str = "damage_more_than_four";
    pub const CAR_INSURANCE: &str = "car_insurance";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Category list '{0}' is not configured")]
    MissingCategory(String),
}

/// Location of the data archive and the CSV entries inside it.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub archive: PathBuf,
    pub primary_person: String,
    pub units: String,
    pub charges: String,
    pub damages: String,
    #[serde(default)]
    pub restrict: Option<String>,
    #[serde(default)]
    pub endorse: Option<String>,
}

/// Parsed analytics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    pub paths: DataPaths,
    #[serde(default)]
    pub columns: ColumnMap,
    #[serde(flatten)]
    categories: BTreeMap<String, Vec<String>>,
}

impl AnalyticsConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Look up a named category list.
    pub fn categories(&self, key: &str) -> Result<&[String], ConfigError> {
        self.categories
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::MissingCategory(key.to_string()))
    }

    /// Names of all configured category lists.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}
