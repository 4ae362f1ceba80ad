//! Transformation pipeline.
//!
//! Orchestrates one run over an immutable plan snapshot: build the
//! dependency graph, classify resources, resolve containment parents, execute
//! the strategy registry, merge the candidate dataflows, and assemble the
//! OTM document. Structural graph errors abort; mapping and strategy
//! conditions are accumulated into the output.

use tracing::{debug, info};

use crate::config::{TransformConfig, Validatable};
use crate::error::{MappingErrorKind, OtmError, Result};
use crate::graph::{DependencyGraph, RelationshipExtractor};
use crate::mapping::{MappingRuleSet, ResourceMapper, UnmappedPolicy, UnmappedResource};
use crate::model::{OtmDocument, OtmProject, PlanSnapshot, Representation};
use crate::provider;
use crate::strategies::{merge_dataflows, RunDiagnostics, StrategyRegistry};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Unmapped resources present under `--fail-on-unmapped`
    pub const UNMAPPED_RESOURCES: i32 = 1;
    /// Upload was requested and failed
    pub const UPLOAD_FAILED: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Everything one run produces.
#[derive(Debug)]
pub struct TransformOutput {
    /// The assembled OTM document
    pub document: OtmDocument,
    /// Resources that matched no mapping rule
    pub unmapped: Vec<UnmappedResource>,
    /// Per-strategy diagnostics
    pub diagnostics: RunDiagnostics,
}

/// Run the full transformation with the standard strategy set.
pub fn transform(
    snapshot: &PlanSnapshot,
    rules: &MappingRuleSet,
    config: &TransformConfig,
) -> Result<TransformOutput> {
    transform_with_registry(snapshot, rules, config, &StrategyRegistry::standard())
}

/// Run the full transformation with an explicit strategy registry.
pub fn transform_with_registry(
    snapshot: &PlanSnapshot,
    rules: &MappingRuleSet,
    config: &TransformConfig,
    registry: &StrategyRegistry,
) -> Result<TransformOutput> {
    config.validate()?;

    let representation = resolve_representation(snapshot)?;

    let graph = DependencyGraph::from_snapshot(snapshot)?;
    info!(
        resources = graph.len(),
        edges = snapshot.edges.len(),
        "built dependency graph"
    );

    let mapper = ResourceMapper::new(rules);
    let model = mapper.map_resources(&graph, &config.default_trust_zone);
    info!(
        mapped = model.len(),
        unmapped = model.unmapped.len(),
        "classified resources"
    );

    if config.unmapped_policy == UnmappedPolicy::Fail && !model.unmapped.is_empty() {
        let ids: Vec<_> = model.unmapped.iter().map(|u| u.id.as_str()).collect();
        return Err(OtmError::mapping(
            format!("unmapped resources: {}", ids.join(", ")),
            MappingErrorKind::UnmappedResources {
                count: model.unmapped.len(),
            },
        ));
    }

    let extractor = RelationshipExtractor::new(&graph);
    let (candidates, diagnostics) =
        registry.run(&model, &extractor, config.parallel_strategies);
    debug!(candidates = candidates.len(), "strategies finished");

    let dataflows = merge_dataflows(candidates);
    info!(dataflows = dataflows.len(), "merged dataflow set");

    for partial in diagnostics.partial_strategies() {
        debug!(strategy = partial, "strategy produced partial results");
    }

    let document = OtmDocument::assemble(
        OtmProject {
            id: config.project_id.clone(),
            name: config.project_name.clone(),
        },
        representation,
        vec![config.default_trust_zone.clone()],
        model.components(),
        dataflows,
    );

    Ok(TransformOutput {
        document,
        unmapped: model.unmapped,
        diagnostics,
    })
}

/// Resolve the snapshot's provider key against the registry. An unknown key
/// is a validation error; an absent key just omits the representation block.
fn resolve_representation(snapshot: &PlanSnapshot) -> Result<Option<Representation>> {
    match snapshot.provider.as_deref() {
        None => Ok(None),
        Some(key) => match provider::lookup(key) {
            Some(descriptor) => Ok(Some(Representation::from_provider(descriptor))),
            None => Err(OtmError::validation(format!(
                "unknown provider key: {key}"
            ))),
        },
    }
}
