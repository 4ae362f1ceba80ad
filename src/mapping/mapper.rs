//! Resource-to-component mapping.
//!
//! Each resource is classified by the first matching rule; unmatched
//! resources are collected into a report instead of being silently dropped.
//! Whether that report is fatal is the caller's decision, not the mapper's.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::model::{Component, Parent, TrustZone};

use super::rules::MappingRuleSet;

/// Escalation policy for resources that match no mapping rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmappedPolicy {
    /// Report unmapped resources beside the output (default)
    #[default]
    Warn,
    /// Treat any unmapped resource as a run failure
    Fail,
}

/// One entry of the unmapped-resource report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedResource {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

/// The mapper's output: components keyed by source resource id (insertion
/// order = resource order), plus the unmapped report.
#[derive(Debug, Default)]
pub struct MappedModel {
    components: IndexMap<String, Component>,
    pub unmapped: Vec<UnmappedResource>,
}

impl MappedModel {
    /// The component mapped from the given resource, if any.
    pub fn component_for(&self, resource_id: &str) -> Option<&Component> {
        self.components.get(resource_id)
    }

    /// True if the resource produced a component.
    pub fn is_mapped(&self, resource_id: &str) -> bool {
        self.components.contains_key(resource_id)
    }

    /// Mapped components with their source resource ids, in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Component)> {
        self.components.iter()
    }

    /// Mapped components in resource order.
    pub fn components(&self) -> Vec<Component> {
        self.components.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Classifies resources using an ordered rule set.
pub struct ResourceMapper<'a> {
    rules: &'a MappingRuleSet,
}

impl<'a> ResourceMapper<'a> {
    pub fn new(rules: &'a MappingRuleSet) -> Self {
        Self { rules }
    }

    /// Map every resource in the graph. Parents are resolved to the nearest
    /// mapped containment ancestor, falling back to the trust zone.
    pub fn map_resources(&self, graph: &DependencyGraph, trust_zone: &TrustZone) -> MappedModel {
        let mut model = MappedModel::default();

        for resource in graph.resources() {
            match self.rules.match_resource(resource) {
                Some(rule) => {
                    let component = Component::from_resource(resource, &rule.otm_type, trust_zone);
                    model.components.insert(resource.id.clone(), component);
                }
                None => {
                    tracing::warn!(
                        resource = %resource.id,
                        resource_type = %resource.resource_type,
                        "resource matched no mapping rule"
                    );
                    model.unmapped.push(UnmappedResource {
                        id: resource.id.clone(),
                        resource_type: resource.resource_type.clone(),
                    });
                }
            }
        }

        self.resolve_parents(graph, &mut model);
        model
    }

    /// Second pass: containment parents. `ancestors` is breadth-first, so the
    /// first mapped ancestor is the nearest one.
    fn resolve_parents(&self, graph: &DependencyGraph, model: &mut MappedModel) {
        let parent_ids: Vec<(String, String)> = model
            .components
            .keys()
            .filter_map(|resource_id| {
                graph
                    .ancestors(resource_id)
                    .iter()
                    .find_map(|ancestor| model.component_for(&ancestor.id))
                    .map(|parent| (resource_id.clone(), parent.id.clone()))
            })
            .collect();

        for (resource_id, parent_component_id) in parent_ids {
            if let Some(component) = model.components.get_mut(&resource_id) {
                component.parent = Parent::Component(parent_component_id);
            }
        }
    }
}
