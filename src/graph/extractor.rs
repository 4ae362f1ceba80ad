//! Read-only query layer over the dependency graph.
//!
//! Strategies never walk the graph directly; they go through this extractor
//! so that every strategy agrees on the same definition of the derived
//! predicates — in particular `are_hierarchically_related`, which suppresses
//! dataflows between a container and its own children.

use std::collections::{HashSet, VecDeque};

use crate::model::{RelationKind, Resource};

use super::dependency::DependencyGraph;

/// Higher-level relationship queries over an immutable graph snapshot.
pub struct RelationshipExtractor<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> RelationshipExtractor<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &'g DependencyGraph {
        self.graph
    }

    /// True if one resource transitively contains the other, in either
    /// direction. Shared by all strategies as the hierarchy predicate.
    pub fn are_hierarchically_related(&self, a: &str, b: &str) -> bool {
        self.graph.contains(a, b) || self.graph.contains(b, a)
    }

    /// The nearest resources reachable from `from` over edges of `kind` that
    /// satisfy `accept`, in breadth-first order.
    ///
    /// Traversal hops over non-accepted intermediate resources and stops at
    /// each first accepted node, so a chain `a -> glue -> b` (with `glue`
    /// rejected) yields `b`. Cycle-safe; `from` itself is never returned.
    pub fn reachable_accepted(
        &self,
        from: &str,
        kind: RelationKind,
        accept: &dyn Fn(&str) -> bool,
    ) -> Vec<&'g Resource> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(from);
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(from);
        let mut found = Vec::new();

        while let Some(current) = queue.pop_front() {
            for neighbor in self.graph.neighbors(current, Some(kind)) {
                if !visited.insert(neighbor.id.as_str()) {
                    continue;
                }
                if accept(&neighbor.id) {
                    found.push(neighbor);
                } else {
                    queue.push_back(neighbor.id.as_str());
                }
            }
        }

        found
    }

    /// Resources attached to `group` (incoming `Attachment` edges), in edge
    /// insertion order. Membership direction is member -> group.
    pub fn attached_members(&self, group: &str) -> Vec<&'g Resource> {
        self.graph.predecessors(group, Some(RelationKind::Attachment))
    }

    /// True if a security rule edge `from -> to` exists.
    pub fn security_rule_exists(&self, from: &str, to: &str) -> bool {
        self.graph
            .neighbors(from, Some(RelationKind::SecurityRule))
            .iter()
            .any(|r| r.id == to)
    }

    /// True if the resource appears as an endpoint of any security rule,
    /// i.e. behaves as a security group.
    pub fn is_security_group(&self, id: &str) -> bool {
        !self
            .graph
            .neighbors(id, Some(RelationKind::SecurityRule))
            .is_empty()
            || !self
                .graph
                .predecessors(id, Some(RelationKind::SecurityRule))
                .is_empty()
    }
}
