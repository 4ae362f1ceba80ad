//! Dataflows from security-group rules.
//!
//! Security groups are resources connected by `SecurityRule` edges; a rule
//! edge SG1 -> SG2 allows traffic from members of SG1 to members of SG2.
//! Membership is an `Attachment` edge member -> group. For each rule the
//! strategy emits flows between every mapped member pair; when the reverse
//! rule also exists the flow is emitted bidirectional, and the commutative
//! identifier collapses the two observations in the merge step.

use crate::graph::RelationshipExtractor;
use crate::mapping::MappedModel;
use crate::model::RelationKind;

use super::{create_dataflow, DataflowCreationStrategy, HierarchyPredicate, StrategyOutput};

pub struct DataflowsBySecurityGroups;

impl DataflowCreationStrategy for DataflowsBySecurityGroups {
    fn name(&self) -> &'static str {
        "security-groups"
    }

    fn create_dataflows(
        &self,
        model: &MappedModel,
        extractor: &RelationshipExtractor<'_>,
        are_hierarchically_related: &HierarchyPredicate<'_>,
    ) -> StrategyOutput {
        let mut output = StrategyOutput::new();

        for (source_group, target_group) in
            extractor.graph().edges_of_kind(RelationKind::SecurityRule)
        {
            let bidirectional = extractor.security_rule_exists(&target_group.id, &source_group.id);

            let sources: Vec<_> = extractor
                .attached_members(&source_group.id)
                .into_iter()
                .filter(|r| model.is_mapped(&r.id))
                .collect();
            let targets: Vec<_> = extractor
                .attached_members(&target_group.id)
                .into_iter()
                .filter(|r| model.is_mapped(&r.id))
                .collect();

            if sources.is_empty() || targets.is_empty() {
                output.skip(format!(
                    "security rule {} -> {} has no mapped members on one side",
                    source_group.id, target_group.id
                ));
                continue;
            }

            for source in &sources {
                for target in &targets {
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
                        continue;
                    };
                    output.dataflows.push(create_dataflow(
                        source_component,
                        target_component,
                        bidirectional,
                    ));
                }
            }
        }

        output
    }
}
