//! OTM components and trust zones.

use serde::{Deserialize, Serialize};

use super::identity;
use super::resource::Resource;

/// Fixed id of the built-in default trust zone. Every component without a
/// mapped containment ancestor is parented here.
pub const DEFAULT_TRUST_ZONE_ID: &str = "b61d6911-338d-46a8-9f39-8dcd24abfe91";

/// A trust boundary in the output model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustZone {
    pub id: String,
    pub name: String,
    pub risk: TrustZoneRisk,
}

/// Risk rating carried by a trust zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustZoneRisk {
    pub trust_rating: u8,
}

impl TrustZone {
    pub fn new(id: impl Into<String>, name: impl Into<String>, trust_rating: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            risk: TrustZoneRisk { trust_rating },
        }
    }

    /// The built-in "Public Cloud" zone used when no zone is configured.
    pub fn public_cloud() -> Self {
        Self::new(DEFAULT_TRUST_ZONE_ID, "Public Cloud", 10)
    }
}

impl Default for TrustZone {
    fn default() -> Self {
        Self::public_cloud()
    }
}

/// Parent of a component: either a trust zone or another component.
///
/// Serialized in OTM form, e.g. `{"trustZone": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Parent {
    TrustZone(String),
    Component(String),
}

/// A mapped, provider-agnostic node in the output model.
///
/// Created by the resource mapper from exactly one source resource; the
/// identifier is a deterministic function of the resource's source id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    /// OTM component-type tag from the mapping rules
    #[serde(rename = "type")]
    pub component_type: String,
    pub parent: Parent,
    /// Provenance tags (the source resource kind)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Source resource identifier; internal provenance, not part of the
    /// serialized document
    #[serde(skip)]
    pub source_id: String,
}

impl Component {
    /// Build the component for a mapped resource. The parent defaults to the
    /// given trust zone; containment parents are resolved by the mapper
    /// afterwards.
    pub fn from_resource(resource: &Resource, otm_type: &str, trust_zone: &TrustZone) -> Self {
        Self {
            id: identity::component_id(&resource.id),
            name: resource.display_name().to_string(),
            component_type: otm_type.to_string(),
            parent: Parent::TrustZone(trust_zone.id.clone()),
            tags: vec![resource.resource_type.clone()],
            source_id: resource.id.clone(),
        }
    }
}
