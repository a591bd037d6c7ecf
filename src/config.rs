//! Scan configuration.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How superclasses are expressed in a subclass schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutoInheritance {
    /// Inherited properties are flattened into the subclass
    #[default]
    None,
    /// The parent is referenced from `allOf`; only the class's own properties are listed
    #[serde(alias = "PROPERTIES-ONLY", alias = "PROPERTIES_ONLY")]
    ParentOnly,
    /// The parent is referenced from `allOf` and every property is listed as well
    Both,
}

/// Configuration of one scan, loaded from YAML or JSON with kebab-case keys.
///
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScanConfig {
    /// Whether eligible types are registered as component schemas
    pub schema_references_enable: bool,
    /// Name of a custom schema registry to invoke at scan start
    pub custom_schema_registry: Option<String>,
    /// Active serialization views (fully qualified class names)
    pub json_views: Vec<String>,
    /// Whether properties without any schema or property annotation are kept
    pub infer_unannotated_types: bool,
    /// Whether non-public members are exposed by default
    pub private_properties_enable: bool,
    /// Whether array-shaped types may be registered
    pub array_references_enable: bool,
    /// Whether properties without explicit order are sorted by name
    pub sorted_properties_enable: bool,
    pub auto_inheritance: AutoInheritance,
    /// Global property naming strategy
    pub property_naming_strategy: Option<String>,
    /// Type signature to JSON schema overrides
    pub schemas: IndexMap<String, String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            schema_references_enable: true,
            custom_schema_registry: None,
            json_views: Vec::new(),
            infer_unannotated_types: true,
            private_properties_enable: true,
            array_references_enable: true,
            sorted_properties_enable: true,
            auto_inheritance: AutoInheritance::None,
            property_naming_strategy: None,
            schemas: IndexMap::new(),
        }
    }
}

impl ScanConfig {
    /// Loads a configuration file; `.json` files are read as JSON, anything else as YAML
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading scan configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| {
            Error::InvalidConfig(format!("{}: {}", path.display(), message))
        })
    }
}
