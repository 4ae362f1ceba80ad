//! Determinism and idempotence guarantees.

use otm_tools::config::TransformConfig;
use otm_tools::mapping::{MappingRule, MappingRuleSet};
use otm_tools::model::{PlanSnapshot, RelationKind, Resource, ResourceEdge};
use otm_tools::pipeline::transform;
use otm_tools::strategies::merge_dataflows;
use otm_tools::Dataflow;

/// A snapshot exercising every edge kind and an unmapped glue resource.
fn mixed_snapshot() -> PlanSnapshot {
    PlanSnapshot {
        provider: Some("TFPLAN".to_string()),
        resources: vec![
            Resource::new("vpc", "aws_vpc").with_name("vpc"),
            Resource::new("web", "compute").with_name("web"),
            Resource::new("role", "iam_role"),
            Resource::new("db", "database").with_name("db"),
            Resource::new("lb", "load_balancer").with_name("lb"),
            Resource::new("sg_web", "security_group"),
            Resource::new("sg_db", "security_group"),
        ],
        edges: vec![
            ResourceEdge::new(RelationKind::Containment, "vpc", "web"),
            ResourceEdge::new(RelationKind::Containment, "vpc", "db"),
            ResourceEdge::new(RelationKind::Reference, "web", "role"),
            ResourceEdge::new(RelationKind::Reference, "role", "db"),
            ResourceEdge::new(RelationKind::Attachment, "lb", "web"),
            ResourceEdge::new(RelationKind::Attachment, "web", "sg_web"),
            ResourceEdge::new(RelationKind::Attachment, "db", "sg_db"),
            ResourceEdge::new(RelationKind::SecurityRule, "sg_web", "sg_db"),
        ],
    }
}

fn mixed_rules() -> MappingRuleSet {
    MappingRuleSet::from_rules(vec![
        MappingRule::new("aws_vpc", "vpc"),
        MappingRule::new("compute", "ec2"),
        MappingRule::new("database", "rds"),
        MappingRule::new("load_balancer", "load-balancer"),
    ])
    .unwrap()
}

#[test]
fn repeated_runs_produce_byte_identical_documents() {
    let snapshot = mixed_snapshot();
    let rules = mixed_rules();
    let config = TransformConfig::default();

    let first = transform(&snapshot, &rules, &config)
        .unwrap()
        .document
        .to_json_pretty()
        .unwrap();
    let second = transform(&snapshot, &rules, &config)
        .unwrap()
        .document
        .to_json_pretty()
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn identifier_sets_are_stable_across_runs() {
    let snapshot = mixed_snapshot();
    let rules = mixed_rules();
    let config = TransformConfig::default();

    let collect_ids = || {
        let output = transform(&snapshot, &rules, &config).unwrap();
        let components: Vec<String> = output
            .document
            .components
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let dataflows: Vec<String> = output
            .document
            .dataflows
            .iter()
            .map(|f| f.id.clone())
            .collect();
        (components, dataflows)
    };

    assert_eq!(collect_ids(), collect_ids());
}

#[test]
fn parallel_execution_does_not_change_the_result() {
    let snapshot = mixed_snapshot();
    let rules = mixed_rules();

    let parallel = transform(
        &snapshot,
        &rules,
        &TransformConfig {
            parallel_strategies: true,
            ..Default::default()
        },
    )
    .unwrap();
    let sequential = transform(
        &snapshot,
        &rules,
        &TransformConfig {
            parallel_strategies: false,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(
        parallel.document.to_json_pretty().unwrap(),
        sequential.document.to_json_pretty().unwrap()
    );
}

#[test]
fn merging_a_set_with_itself_is_a_fixed_point() {
    let output = transform(&mixed_snapshot(), &mixed_rules(), &TransformConfig::default())
        .unwrap();
    let flows = output.document.dataflows;
    assert!(!flows.is_empty(), "scenario should produce flows");

    let mut doubled: Vec<Dataflow> = flows.clone();
    doubled.extend(flows.clone());

    assert_eq!(merge_dataflows(doubled), flows);
}

#[test]
fn resource_declaration_order_is_preserved_in_output() {
    let output = transform(&mixed_snapshot(), &mixed_rules(), &TransformConfig::default())
        .unwrap();

    let names: Vec<_> = output
        .document
        .components
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["vpc", "web", "db", "lb"]);
}
