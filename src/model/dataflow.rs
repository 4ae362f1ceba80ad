//! OTM dataflows.

use serde::{Deserialize, Serialize};

use super::identity;

/// A directed or bidirectional relation between two components.
///
/// The identifier is a pure function of `(source, destination, bidirectional)`
/// per the identity scheme: swapping the endpoints of a bidirectional flow
/// yields the same identifier, while directed flows in opposite directions
/// stay distinct. Dataflows are never mutated after creation; the merge step
/// reconciles candidates by constructing new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataflow {
    pub id: String,
    pub name: String,
    /// Source component id
    pub source: String,
    /// Destination component id
    pub destination: String,
    #[serde(default)]
    pub bidirectional: bool,
}

impl Dataflow {
    /// Build a dataflow between two component ids with a derived identifier.
    ///
    /// Prefer [`crate::strategies::create_dataflow`] inside strategies; this
    /// constructor is the single place the id derivation is applied.
    pub fn between(
        name: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
        bidirectional: bool,
    ) -> Self {
        let source = source.into();
        let destination = destination.into();
        Self {
            id: identity::flow_id(&source, &destination, bidirectional),
            name: name.into(),
            source,
            destination,
            bidirectional,
        }
    }

    /// Endpoint pair key with sorted ends; equal for both directions.
    pub(crate) fn pair_key(&self) -> (String, String) {
        if self.source <= self.destination {
            (self.source.clone(), self.destination.clone())
        } else {
            (self.destination.clone(), self.source.clone())
        }
    }
}
