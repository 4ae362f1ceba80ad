//! **Transform infrastructure-as-code into Open Threat Model documents.**
//!
//! `otm-tools` converts structured descriptions of cloud infrastructure
//! (Terraform plans, CloudFormation templates, architecture diagrams) into an
//! Open Threat Model (OTM) graph: a provider-agnostic representation of
//! components, trust boundaries, and dataflows suitable for automated threat
//! analysis. It powers both a command-line interface and a Rust library for
//! programmatic integration.
//!
//! ## Key Features
//!
//! - **Mapping-driven classification**: ordered, first-match-wins mapping
//!   rules turn provider-specific resource kinds into OTM component types;
//!   unmapped resources are reported, never silently dropped.
//! - **Dataflow synthesis**: independent strategies mine the dependency graph
//!   for evidence of network flows — explicit references, security-group
//!   rules, attachments — and their union is deduplicated into the final
//!   dataflow set.
//! - **Deterministic output**: every component and dataflow identifier is a
//!   pure function of stable semantic keys, so re-running the transformation
//!   on unchanged input yields byte-identical documents.
//! - **Project import**: a finished document can be uploaded to a
//!   threat-modeling platform's project-import endpoint (feature `upload`).
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the data model on both sides of the transformation — raw
//!   [`model::Resource`] records and structural edges on the input side, OTM
//!   [`model::Component`]s, [`model::Dataflow`]s, and the assembled
//!   [`model::OtmDocument`] on the output side, plus the deterministic
//!   identity scheme in [`model::identity`].
//! - **[`graph`]**: the [`DependencyGraph`] built once per run from the plan
//!   snapshot, and the [`RelationshipExtractor`] query layer strategies
//!   consume.
//! - **[`mapping`]**: mapping rule loading and the [`ResourceMapper`].
//! - **[`strategies`]**: the [`DataflowCreationStrategy`] contract, the
//!   registered strategy set, and dataflow merge/dedup.
//! - **[`pipeline`]**: orchestration of one transformation run.
//! - **[`provider`]**: the closed registry of source-technology descriptors.
//!
//! ## Getting Started
//!
//! ```no_run
//! use otm_tools::config::TransformConfig;
//! use otm_tools::mapping::MappingRuleSet;
//! use otm_tools::model::PlanSnapshot;
//! use otm_tools::pipeline;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let snapshot: PlanSnapshot =
//!         serde_json::from_str(&std::fs::read_to_string("plan.json")?)?;
//!     let rules = MappingRuleSet::from_files(&["aws-mapping.yaml"])?;
//!
//!     let output = pipeline::transform(&snapshot, &rules, &TransformConfig::default())?;
//!
//!     println!(
//!         "{} components, {} dataflows, {} unmapped",
//!         output.document.components.len(),
//!         output.document.dataflows.len(),
//!         output.unmapped.len()
//!     );
//!     println!("{}", output.document.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `upload` (default): enables the project-import HTTP client and the
//!   `upload` CLI command. Adds network dependencies like `reqwest`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod mapping;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod strategies;
#[cfg(feature = "upload")]
pub mod upload;

// Re-export main types for convenience
pub use config::{TransformConfig, UploadConfig, Validatable};
pub use error::{ErrorContext, OtmError, Result};
pub use graph::{DependencyGraph, RelationshipExtractor};
pub use mapping::{
    AttributePredicate, MappedModel, MappingRule, MappingRuleSet, ResourceMapper, UnmappedPolicy,
    UnmappedResource,
};
pub use model::{
    Component, Dataflow, OtmDocument, OtmProject, Parent, PlanSnapshot, RelationKind, Resource,
    ResourceEdge, TrustZone,
};
pub use pipeline::{transform, TransformOutput};
pub use provider::{ProviderCategory, ProviderDescriptor};
pub use strategies::{
    create_dataflow, merge_dataflows, DataflowCreationStrategy, StrategyOutput, StrategyRegistry,
};
#[cfg(feature = "upload")]
pub use upload::ImportClient;
