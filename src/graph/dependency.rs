//! In-memory directed graph of infrastructure resources.
//!
//! Built once per transformation from the full resource set and read-only
//! afterwards. Node insertion order is preserved so every derived sequence
//! (neighbors, traversals) is deterministic across runs. Containment is
//! expected to be acyclic, but no traversal assumes it: cycles yield the
//! partial reachable set instead of looping.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use crate::error::{GraphErrorKind, OtmError, Result};
use crate::model::{PlanSnapshot, RelationKind, Resource, ResourceEdge};

/// One stored adjacency entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GraphEdge {
    other: String,
    kind: RelationKind,
}

/// Directed graph of resources and their structural relations.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    resources: IndexMap<String, Resource>,
    outgoing: IndexMap<String, Vec<GraphEdge>>,
    incoming: IndexMap<String, Vec<GraphEdge>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a plan snapshot. Structural errors (duplicate
    /// resource ids, edges to unknown resources) abort with the offending
    /// identifiers rather than producing a partially-correct graph.
    pub fn from_snapshot(snapshot: &PlanSnapshot) -> Result<Self> {
        let mut graph = Self::new();
        for resource in &snapshot.resources {
            graph.add_resource(resource.clone())?;
        }
        for edge in &snapshot.edges {
            graph.add_edge(edge)?;
        }
        tracing::debug!(
            resources = graph.resources.len(),
            edges = snapshot.edges.len(),
            "dependency graph built"
        );
        Ok(graph)
    }

    /// Register a resource node.
    pub fn add_resource(&mut self, resource: Resource) -> Result<()> {
        if self.resources.contains_key(&resource.id) {
            return Err(OtmError::graph(
                "registering resource",
                GraphErrorKind::DuplicateResource { id: resource.id },
            ));
        }
        self.resources.insert(resource.id.clone(), resource);
        Ok(())
    }

    /// Register a directed edge. Both endpoints must already be registered.
    pub fn add_edge(&mut self, edge: &ResourceEdge) -> Result<()> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.resources.contains_key(endpoint) {
                return Err(OtmError::graph(
                    "registering edge",
                    GraphErrorKind::UnknownResource {
                        unknown: endpoint.clone(),
                        source_id: edge.source.clone(),
                        target_id: edge.target.clone(),
                    },
                ));
            }
        }

        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(GraphEdge {
                other: edge.target.clone(),
                kind: edge.kind,
            });
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .push(GraphEdge {
                other: edge.source.clone(),
                kind: edge.kind,
            });
        Ok(())
    }

    /// Look up a resource by source identifier.
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// All resources in insertion order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Directly connected successors in edge insertion order, optionally
    /// filtered by relation kind.
    pub fn neighbors(&self, id: &str, kind: Option<RelationKind>) -> Vec<&Resource> {
        self.adjacent(&self.outgoing, id, kind)
    }

    /// Directly connected predecessors in edge insertion order, optionally
    /// filtered by relation kind.
    pub fn predecessors(&self, id: &str, kind: Option<RelationKind>) -> Vec<&Resource> {
        self.adjacent(&self.incoming, id, kind)
    }

    fn adjacent<'a>(
        &'a self,
        map: &'a IndexMap<String, Vec<GraphEdge>>,
        id: &str,
        kind: Option<RelationKind>,
    ) -> Vec<&'a Resource> {
        map.get(id)
            .map(|edges| {
                edges
                    .iter()
                    .filter(|e| kind.map_or(true, |k| e.kind == k))
                    .filter_map(|e| self.resources.get(&e.other))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All edges of the given kind, in insertion order of their source nodes.
    pub fn edges_of_kind(&self, kind: RelationKind) -> Vec<(&Resource, &Resource)> {
        let mut pairs = Vec::new();
        for (source_id, edges) in &self.outgoing {
            let Some(source) = self.resources.get(source_id) else {
                continue;
            };
            for edge in edges.iter().filter(|e| e.kind == kind) {
                if let Some(target) = self.resources.get(&edge.other) {
                    pairs.push((source, target));
                }
            }
        }
        pairs
    }

    /// Transitive containment ancestors in breadth-first order (nearest
    /// first). Cycle-safe: returns the partial reachable set.
    pub fn ancestors(&self, id: &str) -> Vec<&Resource> {
        self.traverse_containment(id, Direction::Up)
    }

    /// Transitive containment descendants in breadth-first order.
    /// Cycle-safe: returns the partial reachable set.
    pub fn descendants(&self, id: &str) -> Vec<&Resource> {
        self.traverse_containment(id, Direction::Down)
    }

    /// True if `container` transitively contains `contained`.
    pub fn contains(&self, container: &str, contained: &str) -> bool {
        if container == contained {
            return false;
        }
        self.descendants(container).iter().any(|r| r.id == contained)
    }

    fn traverse_containment(&self, start: &str, direction: Direction) -> Vec<&Resource> {
        let map = match direction {
            Direction::Up => &self.incoming,
            Direction::Down => &self.outgoing,
        };

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(start);
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(start);
        let mut reached = Vec::new();

        while let Some(current) = queue.pop_front() {
            let Some(edges) = map.get(current) else {
                continue;
            };
            for edge in edges.iter().filter(|e| e.kind == RelationKind::Containment) {
                let other = edge.other.as_str();
                if !visited.insert(other) {
                    continue;
                }
                if let Some(resource) = self.resources.get(other) {
                    reached.push(resource);
                    queue.push_back(other);
                }
            }
        }

        reached
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}
