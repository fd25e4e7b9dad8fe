//! Data layer: dataset resolution, parsing, and record selection.
//!
//! Architecture:
//! ```text
//!  path / URL / alias
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ registry  │  alias → download URL (local files and URLs skip this)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  .csv / .tsv / .ris → ReviewData
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  label flags → selection mask, text flags → field
//!   └──────────┘
//! ```
use std::path::Path;

use log::{debug, info, warn};

use crate::{Config, DataError};

pub mod filter;
pub mod loader;
pub mod model;
pub mod registry;

pub use filter::Subset;
pub use model::{Label, Record, ReviewData, TextField};

/// Load data from file, URL, or dataset alias.
///
/// Local files win over URLs, URLs over aliases. An alias is looked up in
/// the registry index named by `config`.
pub fn load_data(name: &str, config: &Config) -> Result<ReviewData, DataError> {
    if Path::new(name).exists() || loader::is_url(name) {
        return loader::from_file(name);
    }

    debug!("'{name}' is neither a file nor a URL, trying the dataset registry");
    let registry = match registry::DatasetRegistry::from_index(
        registry::BENCHMARK_GROUP,
        &config.dataset_index,
    ) {
        Ok(registry) => registry,
        Err(err) => {
            warn!("Dataset registry unavailable: {err}");
            return Err(DataError::NotFound(name.to_owned()));
        }
    };

    let entry = registry
        .find(name)
        .ok_or_else(|| DataError::NotFound(name.to_owned()))?;
    info!("Resolved dataset '{name}' to {}", entry.url);

    loader::from_file(&entry.url)
}
