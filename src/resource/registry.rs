//! Resource Registry - Load artifact resource definitions from JSON
//!
//! Each artifact type the CLI can query is described by an entry in the
//! embedded catalog: where it lives on the management API, how a single
//! artifact is looked up, and how it is displayed by default.

use crate::format::FormatDefaults;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/artifacts.json")];

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// Path below `/management/`
    pub path: String,
    /// Query parameter selecting a single artifact by name
    pub lookup_param: String,
    /// Default list layout
    pub list_format: String,
    /// Default single-artifact layout
    pub detail_format: String,
    /// Column headers for table layouts, keyed by field name
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub empty_message: String,
}

impl ResourceDef {
    /// Rendering defaults for this resource
    pub fn format_defaults(&self) -> FormatDefaults {
        FormatDefaults {
            table: self.list_format.clone(),
            detail: self.detail_format.clone(),
            headers: self.headers.clone(),
            empty_message: self.empty_message.clone(),
        }
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get all resource keys, sorted
pub fn get_all_resource_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}

/// Get a resource definition by key, failing with the known keys when absent
pub fn require_resource(key: &str) -> anyhow::Result<&'static ResourceDef> {
    get_resource(key).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown resource: {} (known: {})",
            key,
            get_all_resource_keys().join(", ")
        )
    })
}
