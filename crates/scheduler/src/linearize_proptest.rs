//! Invariant 4: a linearized plan is a topological order of its edge set —
//! for every `(a, b)` where `a` depends on `b`, `b` must come first.

use super::*;
use lcm_core::object::ObjectKey;
use lcm_core::test_support::object_class;
use proptest::prelude::*;
use std::collections::HashMap as StdHashMap;

/// One transition per index, each on its own object (the index is folded
/// into the id so two nodes never collide) but with a proptest-drawn class
/// mix, matching the heterogeneous object classes a real plan spans.
fn transitions_for(classes: &[lcm_core::object::ObjectClass]) -> Vec<Transition> {
    classes
        .iter()
        .enumerate()
        .map(|(i, class)| Transition::new(ObjectKey::new(*class, i.to_string()), "a", "b"))
        .collect()
}

proptest! {
    #[test]
    fn linearize_respects_every_dependency_edge(
        classes in prop::collection::vec(object_class(), 2..8),
        order_keys in prop::collection::vec(any::<u16>(), 2..8),
        edge_bits in prop::collection::vec(any::<bool>(), 0..28),
    ) {
        let n = classes.len().min(order_keys.len());
        let order_keys = &order_keys[..n];
        let nodes = transitions_for(&classes[..n]);

        let mut pairs = Vec::new();
        for i in 0..n {
            for j in 0..i {
                pairs.push((i, j));
            }
        }
        let mut edges = Vec::new();
        for (k, (i, j)) in pairs.iter().enumerate() {
            if edge_bits.get(k).copied().unwrap_or(false) {
                edges.push((nodes[*i].clone(), nodes[*j].clone()));
            }
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| order_keys[i]);

        let mut deps = IndexSet::new();
        for i in order {
            deps.insert(nodes[i].clone());
        }

        let linearized = linearize(deps, &edges);
        prop_assert_eq!(linearized.len(), n);

        let position: StdHashMap<_, _> =
            linearized.iter().cloned().enumerate().map(|(idx, t)| (t, idx)).collect();

        for (a, b) in &edges {
            prop_assert!(position[b] < position[a]);
        }
    }
}
