//! Core data model: raw infrastructure resources on the input side and the
//! Open Threat Model entities (components, trust zones, dataflows) on the
//! output side, plus the deterministic identity scheme tying them together.

pub mod component;
pub mod dataflow;
pub mod document;
pub mod identity;
pub mod resource;

pub use component::{Component, Parent, TrustZone};
pub use dataflow::Dataflow;
pub use document::{OtmDocument, OtmProject, Representation};
pub use resource::{PlanSnapshot, RelationKind, Resource, ResourceEdge};
