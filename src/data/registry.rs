//! Dataset aliases such as `benchmark:van_de_schoot2017`.
//!
//! An index is a JSON document listing datasets, either as an array of
//! entries or as an object keyed by dataset id. Each entry needs at least a
//! `url`; relative URLs are resolved against the index location.

use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use super::loader;
use crate::DataError;

pub const BENCHMARK_INDEX: &str =
    "https://raw.githubusercontent.com/asreview/systematic-review-datasets/master/index.json";
pub const BENCHMARK_GROUP: &str = "benchmark";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetEntry {
    #[serde(default)]
    pub dataset_id: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    group: String,
    entries: Vec<DatasetEntry>,
}

impl DatasetRegistry {
    pub fn from_index(group: &str, location: &str) -> Result<Self, DataError> {
        let bytes = loader::read_bytes(location)?;
        Self::parse(group, &bytes, location)
    }

    pub fn parse(group: &str, bytes: &[u8], location: &str) -> Result<Self, DataError> {
        let index_error = |message: String| DataError::Index {
            location: location.to_owned(),
            message,
        };

        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| index_error(err.to_string()))?;

        let raw: Vec<(Option<String>, Value)> = match value {
            Value::Array(items) => items.into_iter().map(|item| (None, item)).collect(),
            Value::Object(map) => map.into_iter().map(|(id, item)| (Some(id), item)).collect(),
            _ => return Err(index_error("expected an array or an object".to_owned())),
        };

        let mut entries = Vec::with_capacity(raw.len());
        for (key, item) in raw {
            let mut entry: DatasetEntry = match serde_json::from_value(item) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping dataset entry in {location}: {err}");
                    continue;
                }
            };
            if entry.dataset_id.is_empty() {
                entry.dataset_id = key.unwrap_or_default();
            }
            entry.url = resolve_url(location, &entry.url);
            entries.push(entry);
        }

        debug!("Index {location} lists {} datasets", entries.len());
        Ok(Self {
            group: group.to_owned(),
            entries,
        })
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    /// Look up `group:dataset_id` or a bare `dataset_id`. Ids compare
    /// case-insensitively; a prefix naming another group never matches.
    pub fn find(&self, alias: &str) -> Option<&DatasetEntry> {
        let id = match alias.split_once(':') {
            Some((group, id)) if group == self.group => id,
            Some(_) => return None,
            None => alias,
        };

        if id.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.dataset_id.eq_ignore_ascii_case(id))
    }
}

fn resolve_url(index: &str, url: &str) -> String {
    if loader::is_url(url) || Path::new(url).is_absolute() {
        return url.to_owned();
    }

    if loader::is_url(index) {
        match index.rsplit_once('/') {
            Some((base, _)) => format!("{base}/{url}"),
            None => url.to_owned(),
        }
    } else {
        match Path::new(index).parent() {
            Some(dir) => dir.join(url).display().to_string(),
            None => url.to_owned(),
        }
    }
}
