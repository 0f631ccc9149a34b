//! Hand-curated display names for stops.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors loading the alias table.
#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    #[error("failed to read stop names from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid stop names file: {message}")]
    Json { message: String },
}

/// Stop code to display name.
///
/// Only consulted when a stop is first added to the catalog; renaming an
/// entry here doesn't touch stops already stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopAliases {
    names: HashMap<String, String>,
}

impl StopAliases {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AliasError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AliasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, AliasError> {
        let names = serde_json::from_str(json).map_err(|e| AliasError::Json {
            message: e.to_string(),
        })?;
        Ok(Self { names })
    }

    pub fn resolve(&self, stop_code: &str) -> Option<&str> {
        self.names.get(stop_code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StopAliases {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
