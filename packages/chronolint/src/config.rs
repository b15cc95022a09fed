//! Catalog extension config.
//!
//! Optional YAML file adding call shapes to the built-in signature
//! catalog, e.g. an in-house epoch constructor or a protobuf encoder.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ChronolintError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub raw_constructors: Vec<String>,
    #[serde(default)]
    pub normalization_methods: Vec<String>,
    #[serde(default)]
    pub serialization_functions: Vec<String>,
    #[serde(default)]
    pub serialization_methods: Vec<String>,
}

impl CatalogConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_yaml::from_str(&raw)
            .map_err(|e| ChronolintError::config(format!("{}: {e}", path.display())))
    }
}
