//! Dataflow creation strategies.
//!
//! Each strategy is an independent algorithm that proposes dataflows from one
//! category of structural evidence (explicit references, security-group
//! rules, attachments). The engine executes the full registered set and takes
//! the union of their outputs before deduplication, so strategies are
//! order-insensitive and safe to run in parallel.
//!
//! Two invariants bind every strategy: never emit a dataflow between two
//! hierarchically related components, and never emit a self-loop. A candidate
//! a strategy cannot resolve is skipped and recorded, never fatal.

mod attachments;
pub mod merge;
mod references;
mod security_groups;

pub use attachments::DataflowsByAttachments;
pub use merge::merge_dataflows;
pub use references::DataflowsByReferences;
pub use security_groups::DataflowsBySecurityGroups;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::graph::RelationshipExtractor;
use crate::mapping::MappedModel;
use crate::model::{Component, Dataflow};

/// The shared hierarchy predicate injected into every strategy, so all
/// strategies agree on one definition of "hierarchically related".
pub type HierarchyPredicate<'a> = dyn Fn(&str, &str) -> bool + Sync + 'a;

/// Canonical dataflow construction used by all strategies: the name is
/// `"<source> to <target>"` and the identifier comes from the identity
/// scheme, commutative for bidirectional flows.
pub fn create_dataflow(source: &Component, target: &Component, bidirectional: bool) -> Dataflow {
    Dataflow::between(
        format!("{} to {}", source.name, target.name),
        source.id.clone(),
        target.id.clone(),
        bidirectional,
    )
}

/// One strategy's proposals plus its skipped-candidate diagnostics.
#[derive(Debug, Default)]
pub struct StrategyOutput {
    pub dataflows: Vec<Dataflow>,
    pub skipped: Vec<String>,
}

impl StrategyOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a candidate the strategy could not resolve.
    pub fn skip(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::debug!(reason = %reason, "strategy skipped candidate");
        self.skipped.push(reason);
    }
}

/// Contract for one dataflow-discovery algorithm.
///
/// Implementations are pure functions of the mapped model, the extractor,
/// and the hierarchy predicate; they hold no mutable state.
pub trait DataflowCreationStrategy: Send + Sync {
    /// Stable name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Propose dataflow candidates from this strategy's evidence category.
    fn create_dataflows(
        &self,
        model: &MappedModel,
        extractor: &RelationshipExtractor<'_>,
        are_hierarchically_related: &HierarchyPredicate<'_>,
    ) -> StrategyOutput;
}

/// Per-strategy run diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyDiagnostics {
    pub strategy: String,
    pub produced: usize,
    pub skipped: Vec<String>,
}

/// Aggregated diagnostics for one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub strategies: Vec<StrategyDiagnostics>,
}

impl RunDiagnostics {
    /// Strategies that skipped at least one candidate.
    pub fn partial_strategies(&self) -> Vec<&str> {
        self.strategies
            .iter()
            .filter(|s| !s.skipped.is_empty())
            .map(|s| s.strategy.as_str())
            .collect()
    }
}

/// Explicit ordered list of registered strategies.
///
/// Registration happens at construction; there is no runtime discovery. The
/// final result does not depend on registration order because merge dedup is
/// identifier-based.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn DataflowCreationStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard strategy set.
    pub fn standard() -> Self {
        Self::new()
            .with_strategy(Box::new(DataflowsByReferences))
            .with_strategy(Box::new(DataflowsBySecurityGroups))
            .with_strategy(Box::new(DataflowsByAttachments))
    }

    /// Register an additional strategy after the existing ones.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Box<dyn DataflowCreationStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Execute every registered strategy and collect the union of their
    /// candidates (pre-merge) with diagnostics. With `parallel` the
    /// strategies fan out over the rayon pool; outputs are still collected
    /// in registration order.
    pub fn run(
        &self,
        model: &MappedModel,
        extractor: &RelationshipExtractor<'_>,
        parallel: bool,
    ) -> (Vec<Dataflow>, RunDiagnostics) {
        let hierarchy =
            |a: &str, b: &str| extractor.are_hierarchically_related(a, b);

        let outputs: Vec<(&'static str, StrategyOutput)> = if parallel {
            self.strategies
                .par_iter()
                .map(|s| (s.name(), s.create_dataflows(model, extractor, &hierarchy)))
                .collect()
        } else {
            self.strategies
                .iter()
                .map(|s| (s.name(), s.create_dataflows(model, extractor, &hierarchy)))
                .collect()
        };

        let mut candidates = Vec::new();
        let mut diagnostics = RunDiagnostics::default();
        for (name, output) in outputs {
            diagnostics.strategies.push(StrategyDiagnostics {
                strategy: name.to_string(),
                produced: output.dataflows.len(),
                skipped: output.skipped,
            });
            candidates.extend(output.dataflows);
        }

        (candidates, diagnostics)
    }
}
