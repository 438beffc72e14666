//! Store configuration: which backend to build and which collections it holds.
//!
//! The collection set is fixed when the store is built. Configuration can be
//! read from JSON or from `LARDER_*` environment variables.
//!
//! | variable                  | meaning                                   |
//! |---------------------------|-------------------------------------------|
//! | `LARDER_BACKEND`          | `memory` (default) or `mongodb`           |
//! | `LARDER_COLLECTIONS`      | comma-separated collection names          |
//! | `LARDER_MONGODB_DSN`      | connection string for the `mongodb` backend |
//! | `LARDER_MONGODB_DATABASE` | database name for the `mongodb` backend   |

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Collections every store is created with unless configured otherwise.
pub const DEFAULT_COLLECTIONS: [&str; 4] = ["users", "categories", "products", "orders"];

pub const ENV_BACKEND: &str = "LARDER_BACKEND";
pub const ENV_COLLECTIONS: &str = "LARDER_COLLECTIONS";
pub const ENV_MONGODB_DSN: &str = "LARDER_MONGODB_DSN";
pub const ENV_MONGODB_DATABASE: &str = "LARDER_MONGODB_DATABASE";

/// Returns [`DEFAULT_COLLECTIONS`] as owned names.
pub fn default_collections() -> Vec<String> {
    DEFAULT_COLLECTIONS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Checks that a collection set is non-empty and free of blank or duplicate names.
///
/// Every backend builder runs this, so a store can never be built over a set
/// that [`StoreConfig::validate`] would reject.
pub fn validate_collections(collections: &[String]) -> DocumentStoreResult<()> {
    if collections.is_empty() {
        return Err(DocumentStoreError::Configuration("at least one collection is required".into()));
    }

    let mut seen = HashSet::new();
    for name in collections {
        if name.trim().is_empty() {
            return Err(DocumentStoreError::Configuration("collection names must not be blank".into()));
        }
        if !seen.insert(name.as_str()) {
            return Err(DocumentStoreError::Configuration(format!("duplicate collection `{name}`")));
        }
    }

    Ok(())
}

/// Which storage variant backs the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Process-local, volatile storage.
    #[default]
    Memory,
    /// A MongoDB deployment.
    Mongodb {
        dsn: String,
        database: String,
    },
}

/// Top-level store configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage variant to build.
    pub backend: BackendConfig,
    /// Collections created at startup. Any other name is rejected by the store.
    pub collections: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            collections: default_collections(),
        }
    }
}

impl StoreConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> DocumentStoreResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| DocumentStoreError::Configuration(e.to_string()))
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> DocumentStoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from `LARDER_*` variables resolved through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> DocumentStoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let collections = match lookup(ENV_COLLECTIONS) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect(),
            None => default_collections(),
        };

        let backend = match lookup(ENV_BACKEND).as_deref().map(str::trim) {
            None | Some("") | Some("memory") => BackendConfig::Memory,
            Some("mongodb") => BackendConfig::Mongodb {
                dsn: lookup(ENV_MONGODB_DSN).ok_or_else(|| {
                    DocumentStoreError::Configuration(format!("{ENV_MONGODB_DSN} is required for the mongodb backend"))
                })?,
                database: lookup(ENV_MONGODB_DATABASE).ok_or_else(|| {
                    DocumentStoreError::Configuration(format!("{ENV_MONGODB_DATABASE} is required for the mongodb backend"))
                })?,
            },
            Some(other) => {
                return Err(DocumentStoreError::Configuration(format!("unknown backend `{other}`")));
            }
        };

        Ok(Self { backend, collections })
    }

    /// Checks the collection set with [`validate_collections`].
    pub fn validate(&self) -> DocumentStoreResult<()> {
        validate_collections(&self.collections)
    }
}
