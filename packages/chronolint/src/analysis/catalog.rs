//! Signature catalog: the call shapes the analysis recognizes.
//!
//! Pure data, no state. Supporting a new epoch constructor or encoder is a
//! table addition here (or a config entry), never a flow-logic change.
//! Matching is by resolved call-target text; the driver's parse already
//! disambiguated the callee.

use crate::config::CatalogConfig;

/// Known raw-time constructors, normalizers, and serialization entry points.
#[derive(Debug, Clone)]
pub struct SignatureCatalog {
    /// Calls producing a point-in-time value from a raw epoch, zone implicit.
    raw_constructors: Vec<String>,
    /// Methods that always return the canonical-zone representation.
    normalization_methods: Vec<String>,
    /// Methods that normalize only when given a canonical-zone argument.
    zone_argument_normalizers: Vec<String>,
    canonical_zone_arguments: Vec<String>,
    /// Package-level serialization functions.
    serialization_functions: Vec<String>,
    /// Serialization method names (encoder objects).
    serialization_methods: Vec<String>,
}

impl SignatureCatalog {
    /// Catalog with the built-in Go stdlib entries.
    pub fn new() -> Self {
        Self {
            raw_constructors: to_strings(&[
                "time.Unix",
                "time.UnixMilli",
                "time.UnixMicro",
                "time.UnixNano",
            ]),
            normalization_methods: to_strings(&["UTC"]),
            zone_argument_normalizers: to_strings(&["In"]),
            canonical_zone_arguments: to_strings(&["time.UTC"]),
            serialization_functions: to_strings(&[
                "json.Marshal",
                "json.MarshalIndent",
                "xml.Marshal",
                "xml.MarshalIndent",
            ]),
            serialization_methods: to_strings(&["Encode"]),
        }
    }

    /// Built-in catalog extended with user config entries.
    pub fn with_config(config: &CatalogConfig) -> Self {
        let mut catalog = Self::new();
        catalog
            .raw_constructors
            .extend(config.raw_constructors.iter().cloned());
        catalog
            .normalization_methods
            .extend(config.normalization_methods.iter().cloned());
        catalog
            .serialization_functions
            .extend(config.serialization_functions.iter().cloned());
        catalog
            .serialization_methods
            .extend(config.serialization_methods.iter().cloned());
        catalog
    }

    /// Is this call target a raw-time construction (e.g. `time.Unix`)?
    pub fn is_raw_construction(&self, callee: &str) -> bool {
        self.raw_constructors.iter().any(|c| c == callee)
    }

    /// Is this method call a normalization to the canonical zone?
    ///
    /// `UTC()` always is; `In(x)` only when `x` is literally `time.UTC`.
    pub fn is_normalization(&self, method: &str, first_arg: Option<&str>) -> bool {
        if self.normalization_methods.iter().any(|m| m == method) {
            return true;
        }
        if self.zone_argument_normalizers.iter().any(|m| m == method) {
            return first_arg
                .map(|arg| self.canonical_zone_arguments.iter().any(|z| z == arg))
                .unwrap_or(false);
        }
        false
    }

    /// Is this call target a serialization function (e.g. `json.Marshal`)?
    pub fn is_serialization_function(&self, callee: &str) -> bool {
        self.serialization_functions.iter().any(|f| f == callee)
    }

    /// Is this method name a serialization boundary (e.g. `Encode`)?
    pub fn is_serialization_method(&self, method: &str) -> bool {
        self.serialization_methods.iter().any(|m| m == method)
    }
}

impl Default for SignatureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
