//! Dataflows from explicit configuration references.
//!
//! A reference edge means the source resource's configuration points at the
//! target, which justifies a directed flow from the referencing component to
//! the referenced one. Unmapped intermediate resources (IAM roles, policies,
//! other glue) are hopped over: the flow lands on the nearest mapped
//! resources reachable through the reference chain.

use crate::graph::RelationshipExtractor;
use crate::mapping::MappedModel;
use crate::model::RelationKind;

use super::{create_dataflow, DataflowCreationStrategy, HierarchyPredicate, StrategyOutput};

pub struct DataflowsByReferences;

impl DataflowCreationStrategy for DataflowsByReferences {
    fn name(&self) -> &'static str {
        "references"
    }

    fn create_dataflows(
        &self,
        model: &MappedModel,
        extractor: &RelationshipExtractor<'_>,
        are_hierarchically_related: &HierarchyPredicate<'_>,
    ) -> StrategyOutput {
        let mut output = StrategyOutput::new();

        for (resource_id, component) in model.iter() {
            let accept = |id: &str| model.is_mapped(id);
            for target in
                extractor.reachable_accepted(resource_id, RelationKind::Reference, &accept)
            {
                if target.id == *resource_id {
                    continue;
                }
                if are_hierarchically_related(resource_id, &target.id) {
                    continue;
                }
                match model.component_for(&target.id) {
                    Some(target_component) => {
                        output
                            .dataflows
                            .push(create_dataflow(component, target_component, false));
                    }
                    None => {
                        output.skip(format!(
                            "reference target {} has no mapped component",
                            target.id
                        ));
                    }
                }
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;
    use crate::mapping::{MappingRule, MappingRuleSet, ResourceMapper};
    use crate::model::{PlanSnapshot, Resource, ResourceEdge, TrustZone};

    fn run_strategy(
        resources: Vec<Resource>,
        edges: Vec<(RelationKind, &str, &str)>,
        rules: Vec<MappingRule>,
    ) -> StrategyOutput {
        let graph = DependencyGraph::from_snapshot(&PlanSnapshot {
            provider: None,
            resources,
            edges: edges
                .into_iter()
                .map(|(k, s, t)| ResourceEdge::new(k, s, t))
                .collect(),
        })
        .unwrap();
        let rules = MappingRuleSet::from_rules(rules).unwrap();
        let model = ResourceMapper::new(&rules).map_resources(&graph, &TrustZone::default());
        let extractor = RelationshipExtractor::new(&graph);
        let hierarchy = |a: &str, b: &str| extractor.are_hierarchically_related(a, b);

        DataflowsByReferences.create_dataflows(&model, &extractor, &hierarchy)
    }

    #[test]
    fn test_direct_reference_produces_directed_flow() {
        let output = run_strategy(
            vec![
                Resource::new("web", "compute").with_name("web"),
                Resource::new("db", "database").with_name("db"),
            ],
            vec![(RelationKind::Reference, "web", "db")],
            vec![
                MappingRule::new("compute", "ec2"),
                MappingRule::new("database", "rds"),
            ],
        );

        assert_eq!(output.dataflows.len(), 1);
        let flow = &output.dataflows[0];
        assert_eq!(flow.name, "web to db");
        assert!(!flow.bidirectional);
        assert!(output.skipped.is_empty());
    }

    #[test]
    fn test_hops_over_unmapped_glue() {
        // web -> role (unmapped) -> db: one flow web -> db
        let output = run_strategy(
            vec![
                Resource::new("web", "compute").with_name("web"),
                Resource::new("role", "iam_role"),
                Resource::new("db", "database").with_name("db"),
            ],
            vec![
                (RelationKind::Reference, "web", "role"),
                (RelationKind::Reference, "role", "db"),
            ],
            vec![
                MappingRule::new("compute", "ec2"),
                MappingRule::new("database", "rds"),
            ],
        );

        assert_eq!(output.dataflows.len(), 1);
        assert_eq!(output.dataflows[0].name, "web to db");
    }

    #[test]
    fn test_no_flow_between_hierarchically_related() {
        // vpc contains web; vpc also references web — suppressed
        let output = run_strategy(
            vec![
                Resource::new("vpc", "aws_vpc").with_name("vpc"),
                Resource::new("web", "compute").with_name("web"),
            ],
            vec![
                (RelationKind::Containment, "vpc", "web"),
                (RelationKind::Reference, "vpc", "web"),
            ],
            vec![
                MappingRule::new("aws_vpc", "vpc"),
                MappingRule::new("compute", "ec2"),
            ],
        );

        assert!(output.dataflows.is_empty());
    }

    #[test]
    fn test_no_self_loop() {
        let output = run_strategy(
            vec![Resource::new("web", "compute").with_name("web")],
            vec![(RelationKind::Reference, "web", "web")],
            vec![MappingRule::new("compute", "ec2")],
        );

        assert!(output.dataflows.is_empty());
    }

    #[test]
    fn test_unmapped_source_produces_nothing() {
        let output = run_strategy(
            vec![
                Resource::new("role", "iam_role"),
                Resource::new("db", "database").with_name("db"),
            ],
            vec![(RelationKind::Reference, "role", "db")],
            vec![MappingRule::new("database", "rds")],
        );

        assert!(output.dataflows.is_empty());
    }

    #[test]
    fn test_reference_cycle_terminates() {
        let output = run_strategy(
            vec![
                Resource::new("a", "compute").with_name("a"),
                Resource::new("b", "compute").with_name("b"),
            ],
            vec![
                (RelationKind::Reference, "a", "b"),
                (RelationKind::Reference, "b", "a"),
            ],
            vec![MappingRule::new("compute", "ec2")],
        );

        // One flow per direction; dedup is the merge step's job
        assert_eq!(output.dataflows.len(), 2);
    }
}
