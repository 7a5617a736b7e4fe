//! Infrastructure resource records.
//!
//! A [`Resource`] is the unit the upstream parser hands to graph construction.
//! Attributes stay loosely typed (a JSON object) since every provider shapes
//! them differently; see [`crate::attributes`] for lenient accessors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely-typed attribute map of a resource.
pub type Attributes = Map<String, Value>;

/// Resource types that never represent infrastructure topology.
///
/// These are helper or utility resources (key generation, local files, random
/// values, timers) and are dropped before graph construction.
const EXCLUDED_TYPES: &[&str] = &[
    "tls_private_key",
    "tls_cert_request",
    "tls_locally_signed_cert",
    "tls_self_signed_cert",
    "local_file",
    "local_sensitive_file",
    "null_resource",
    "random_id",
    "random_integer",
    "random_password",
    "random_pet",
    "random_shuffle",
    "random_string",
    "random_uuid",
    "time_sleep",
    "time_static",
    "time_rotating",
    "time_offset",
    "terraform_data",
    "external",
    "http",
    "template_file",
    "template_dir",
    "template_cloudinit_config",
    "archive_file",
];

/// A single infrastructure resource record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    /// Stable identifier, referenced by other resources' dependencies.
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub provider: String,
    pub attributes: Attributes,
    pub dependencies: Vec<String>,
}

impl Resource {
    /// Creates a resource with no attributes and no dependencies.
    pub fn new(
        id: impl Into<String>,
        resource_type: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            name: name.into(),
            provider: provider.into(),
            attributes: Attributes::new(),
            dependencies: Vec::new(),
        }
    }

    /// Sets a single attribute, returning the updated resource.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Appends a dependency on another resource ID.
    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// Returns true for association and attachment helper records.
    ///
    /// Load balancer associations are real topology and are not considered
    /// helpers.
    pub fn is_link_record(&self) -> bool {
        let lowered = self.resource_type.to_ascii_lowercase();
        (lowered.contains("_association") || lowered.contains("_attachment"))
            && !lowered.contains("load_balancer")
    }

    /// Returns true if the resource should become a node in the diagram.
    pub fn is_diagrammable(&self) -> bool {
        !EXCLUDED_TYPES.contains(&self.resource_type.as_str()) && !self.is_link_record()
    }
}

/// Provider prefixes stripped from resource types for display.
const PROVIDER_PREFIXES: &[&str] = &["azurerm_", "aws_", "google_", "digitalocean_"];

/// Human-readable name of a resource type.
///
/// # Examples
///
/// ```
/// use cartography_core::resource::display_type_name;
///
/// assert_eq!(display_type_name("aws_security_group"), "Security Group");
/// assert_eq!(display_type_name("azurerm_lb_rule"), "Lb Rule");
/// ```
pub fn display_type_name(resource_type: &str) -> String {
    let stripped = PROVIDER_PREFIXES
        .iter()
        .find_map(|prefix| resource_type.strip_prefix(prefix))
        .unwrap_or(resource_type);

    stripped
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
