//! Raw infrastructure resources and structural edges.
//!
//! These are the validated input records handed over by the format-specific
//! parsing layer: a plan snapshot holds an ordered resource list plus an
//! ordered list of raw structural edges. The core treats both as immutable
//! for the duration of a transformation run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw infrastructure object from the source plan.
///
/// The type tag is provider-specific (e.g. `aws_instance`); the id is the
/// stable source identifier the rest of the pipeline keys on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Stable source identifier (e.g. the Terraform address)
    pub id: String,
    /// Provider-specific resource kind
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Display name; falls back to the id when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Configuration attributes, in source order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, serde_json::Value>,
}

impl Resource {
    /// Create a resource with no attributes.
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            name: None,
            attributes: IndexMap::new(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a configuration attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// The display name, falling back to the source identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Kind of structural relation between two resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    /// Source contains target (e.g. VPC contains subnet)
    Containment,
    /// Source configuration references target
    Reference,
    /// Traffic rule from one security group to another
    SecurityRule,
    /// Source is attached to target (group membership, LB targets)
    Attachment,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Containment => "containment",
            Self::Reference => "reference",
            Self::SecurityRule => "security-rule",
            Self::Attachment => "attachment",
        };
        write!(f, "{s}")
    }
}

/// A directed raw structural edge between two resources, by source identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEdge {
    pub kind: RelationKind,
    pub source: String,
    pub target: String,
}

impl ResourceEdge {
    pub fn new(kind: RelationKind, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The full parsed input to one transformation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Provider key from the registry (e.g. `TFPLAN`), if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Ordered resource records
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Ordered raw structural edges
    #[serde(default)]
    pub edges: Vec<ResourceEdge>,
}
