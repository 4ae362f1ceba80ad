//! OTM document assembly and serialization.
//!
//! The assembler combines mapped components, trust zones, and the merged
//! dataflow set into the Open Threat Model document structure. Serialization
//! is deliberately free of timestamps or other run-varying fields so that
//! unchanged input produces byte-identical output.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::provider::ProviderDescriptor;

use super::component::{Component, TrustZone};
use super::dataflow::Dataflow;

/// OTM schema version emitted by this crate.
pub const OTM_VERSION: &str = "0.2.0";

/// Project metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtmProject {
    pub id: String,
    pub name: String,
}

/// Provenance of the source the model was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub representation_type: String,
}

impl Representation {
    /// Build the representation block for a provider descriptor.
    pub fn from_provider(descriptor: &ProviderDescriptor) -> Self {
        Self {
            id: descriptor.key.to_ascii_lowercase(),
            name: descriptor.label.to_string(),
            representation_type: descriptor.category.as_otm_str().to_string(),
        }
    }
}

/// The assembled Open Threat Model document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtmDocument {
    pub otm_version: String,
    pub project: OtmProject,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub representations: Vec<Representation>,
    pub trust_zones: Vec<TrustZone>,
    pub components: Vec<Component>,
    pub dataflows: Vec<Dataflow>,
}

impl OtmDocument {
    /// Assemble a document from the transformation outputs. Collection order
    /// is preserved as given, which the pipeline keeps deterministic.
    pub fn assemble(
        project: OtmProject,
        representation: Option<Representation>,
        trust_zones: Vec<TrustZone>,
        components: Vec<Component>,
        dataflows: Vec<Dataflow>,
    ) -> Self {
        Self {
            otm_version: OTM_VERSION.to_string(),
            project,
            representations: representation.into_iter().collect(),
            trust_zones,
            components,
            dataflows,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
