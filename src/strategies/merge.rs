//! Reconciliation of strategy outputs into the final dataflow set.
//!
//! Distinct strategies may rediscover the same logical flow from different
//! evidence, so the union of their candidates is deduplicated by dataflow
//! identifier. The policy for conflicting observations is explicit: a flow
//! observed as bidirectional by any strategy supersedes one-directional
//! observations of the same endpoint pair.

use std::collections::HashSet;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::model::Dataflow;

/// Merge and deduplicate dataflow candidates.
///
/// Idempotent: merging a set with itself yields the same set. Candidate
/// order is preserved for the surviving flows, so deterministic input order
/// gives deterministic output order.
pub fn merge_dataflows(candidates: Vec<Dataflow>) -> Vec<Dataflow> {
    let mut by_id: IndexMap<String, Dataflow> = IndexMap::with_capacity(candidates.len());

    for flow in candidates {
        match by_id.entry(flow.id.clone()) {
            Entry::Occupied(mut existing) => {
                // Same identifier rediscovered; keep the first payload but
                // let a bidirectional observation win the flag.
                if flow.bidirectional && !existing.get().bidirectional {
                    existing.get_mut().bidirectional = true;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(flow);
            }
        }
    }

    // Pair-level supersession: a bidirectional flow over {a, b} replaces any
    // directed flow between the same endpoints.
    let bidirectional_pairs: HashSet<(String, String)> = by_id
        .values()
        .filter(|f| f.bidirectional)
        .map(Dataflow::pair_key)
        .collect();

    by_id
        .into_values()
        .filter(|f| f.bidirectional || !bidirectional_pairs.contains(&f.pair_key()))
        .collect()
}
