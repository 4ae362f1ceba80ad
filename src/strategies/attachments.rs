//! Dataflows from direct attachments.
//!
//! An attachment edge between two mapped components (load balancer to target
//! group instance, gateway to service) justifies a directed flow from the
//! attaching resource to the attached one. Attachments to security groups
//! are membership edges and belong to the security-group strategy, so they
//! are ignored here.

use crate::graph::RelationshipExtractor;
use crate::mapping::MappedModel;
use crate::model::RelationKind;

use super::{create_dataflow, DataflowCreationStrategy, HierarchyPredicate, StrategyOutput};

pub struct DataflowsByAttachments;

impl DataflowCreationStrategy for DataflowsByAttachments {
    fn name(&self) -> &'static str {
        "attachments"
    }

    fn create_dataflows(
        &self,
        model: &MappedModel,
        extractor: &RelationshipExtractor<'_>,
        are_hierarchically_related: &HierarchyPredicate<'_>,
    ) -> StrategyOutput {
        let mut output = StrategyOutput::new();

        for (source, target) in extractor.graph().edges_of_kind(RelationKind::Attachment) {
            // Security-group membership is the other strategy's evidence
            if extractor.is_security_group(&source.id) || extractor.is_security_group(&target.id) {
                continue;
            }
            if source.id == target.id {
                continue;
            }
            if are_hierarchically_related(&source.id, &target.id) {
                continue;
            }

            let (Some(source_component), Some(target_component)) = (
                model.component_for(&source.id),
                model.component_for(&target.id),
            ) else {
                output.skip(format!(
                    "attachment {} -> {} has an unmapped endpoint",
                    source.id, target.id
                ));
                continue;
            };

            output
                .dataflows
                .push(create_dataflow(source_component, target_component, false));
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

        DataflowsByAttachments.create_dataflows(&model, &extractor, &hierarchy)
    }

    #[test]
    fn test_attachment_between_mapped_components() {
        let output = run_strategy(
            vec![
                Resource::new("lb", "load_balancer").with_name("lb"),
                Resource::new("web", "compute").with_name("web"),
            ],
            vec![(RelationKind::Attachment, "lb", "web")],
            vec![
                MappingRule::new("load_balancer", "load-balancer"),
                MappingRule::new("compute", "ec2"),
            ],
        );

        assert_eq!(output.dataflows.len(), 1);
        assert_eq!(output.dataflows[0].name, "lb to web");
        assert!(!output.dataflows[0].bidirectional);
    }

    #[test]
    fn test_unmapped_endpoint_is_skipped_with_diagnostic() {
        let output = run_strategy(
            vec![
                Resource::new("lb", "load_balancer").with_name("lb"),
                Resource::new("web", "compute"),
            ],
            vec![(RelationKind::Attachment, "lb", "web")],
            vec![MappingRule::new("load_balancer", "load-balancer")],
        );

        assert!(output.dataflows.is_empty());
        assert_eq!(output.skipped.len(), 1);
        assert!(output.skipped[0].contains("web"));
    }

    #[test]
    fn test_security_group_membership_is_ignored() {
        // web attaches to sg, and sg participates in a security rule; the
        // attachment is membership, not a flow.
        let output = run_strategy(
            vec![
                Resource::new("web", "compute").with_name("web"),
                Resource::new("sg", "security_group").with_name("sg"),
                Resource::new("sg2", "security_group").with_name("sg2"),
            ],
            vec![
                (RelationKind::Attachment, "web", "sg"),
                (RelationKind::SecurityRule, "sg", "sg2"),
            ],
            vec![
                MappingRule::new("compute", "ec2"),
                MappingRule::new("security_group", "firewall"),
            ],
        );

        assert!(output.dataflows.is_empty());
        assert!(output.skipped.is_empty());
    }

    #[test]
    fn test_no_flow_for_contained_attachment() {
        let output = run_strategy(
            vec![
                Resource::new("cluster", "ecs_cluster").with_name("cluster"),
                Resource::new("service", "ecs_service").with_name("service"),
            ],
            vec![
                (RelationKind::Containment, "cluster", "service"),
                (RelationKind::Attachment, "cluster", "service"),
            ],
            vec![
                MappingRule::new("ecs_cluster", "ecs"),
                MappingRule::new("ecs_service", "ecs-service"),
            ],
        );

        assert!(output.dataflows.is_empty());
    }
}
