//! Property-based tests for the identity scheme invariants.

use otm_tools::model::identity;
use proptest::prelude::*;

/// Component-id-shaped strings: non-empty printable ASCII without the
/// encoding's control separator.
fn id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.:/-]{1,40}"
}

proptest! {
    #[test]
    fn deterministic_id_is_pure(parts in prop::collection::vec(id_strategy(), 1..5)) {
        let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        prop_assert_eq!(
            identity::deterministic_id(&refs),
            identity::deterministic_id(&refs)
        );
    }

    #[test]
    fn undirected_ids_commute(a in id_strategy(), b in id_strategy()) {
        prop_assert_eq!(
            identity::undirected_flow_id(&a, &b),
            identity::undirected_flow_id(&b, &a)
        );
    }

    #[test]
    fn directed_ids_are_direction_sensitive(a in id_strategy(), b in id_strategy()) {
        prop_assume!(a != b);
        prop_assert_ne!(
            identity::directed_flow_id(&a, &b),
            identity::directed_flow_id(&b, &a)
        );
    }

    #[test]
    fn directed_and_undirected_never_collide(a in id_strategy(), b in id_strategy()) {
        prop_assert_ne!(
            identity::directed_flow_id(&a, &b),
            identity::undirected_flow_id(&a, &b)
        );
    }

    #[test]
    fn component_ids_are_injective_in_practice(a in id_strategy(), b in id_strategy()) {
        prop_assume!(a != b);
        prop_assert_ne!(identity::component_id(&a), identity::component_id(&b));
    }

    #[test]
    fn ids_are_fixed_width_hex(parts in prop::collection::vec(id_strategy(), 1..5)) {
        let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        let id = identity::deterministic_id(&refs);
        prop_assert_eq!(id.len(), 32);
        prop_assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
