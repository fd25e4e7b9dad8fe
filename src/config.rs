//! Environment configuration.
//!
//! Styling comes from the command line; the environment only says where
//! dataset aliases are looked up and which font to use by default.

use std::{env, path::PathBuf};

use crate::data::registry::BENCHMARK_INDEX;

/// Location (file path or URL) of the dataset registry index.
pub const DATASET_INDEX_ENV: &str = "ASREVIEW_WORDCLOUD_DATASET_INDEX";
/// Font file used when `--font` is not given.
pub const FONT_ENV: &str = "ASREVIEW_WORDCLOUD_FONT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dataset_index: String,
    pub font: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_index: BENCHMARK_INDEX.to_owned(),
            font: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Unset or empty
    /// variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            dataset_index: var(DATASET_INDEX_ENV).unwrap_or(defaults.dataset_index),
            font: var(FONT_ENV).map(PathBuf::from).or(defaults.font),
        }
    }
}
