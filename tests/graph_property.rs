//! Property tests over generated dependency graphs.
//!
//! Nodes are `u64` values bound under qualified keys `node{i}`; a node may only depend on
//! nodes with a lower index, which keeps the generated graphs acyclic.

use std::sync::Arc;

use proptest::prelude::*;
use wiregraph::{Binding, GraphResolver, Key, Scope, WiringError};

fn node(i: usize) -> Key {
    Key::named::<u64>(format!("node{i}"))
}

/// Each node: its scope and the lower-indexed nodes it depends on
fn arb_dag() -> impl Strategy<Value = Vec<(Scope, Vec<usize>)>> {
    (1usize..12).prop_flat_map(|size| {
        (0..size)
            .map(|i| {
                let scope = prop_oneof![Just(Scope::Singleton), Just(Scope::Unscoped)];
                let deps = if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec(0..i, 0..4).boxed()
                };
                (scope, deps)
            })
            .collect::<Vec<_>>()
    })
}

fn build(graph: &[(Scope, Vec<usize>)]) -> Result<GraphResolver, WiringError> {
    let mut resolver = GraphResolver::new();
    for (i, (scope, deps)) in graph.iter().enumerate() {
        let keys = deps.iter().map(|&d| node(d)).collect::<Vec<_>>();
        let binding = Binding::from_factory(*scope, keys, |deps| {
            let mut total = 1u64;
            for position in 0..deps.len() {
                total += deps.get::<u64>(position)?;
            }
            Ok(total)
        });
        resolver.register(node(i), binding)?;
    }
    Ok(resolver)
}

proptest! {
    #[test]
    fn acyclic_graphs_resolve(graph in arb_dag()) {
        let resolver = build(&graph).unwrap();
        prop_assert!(resolver.validate().is_ok());

        for i in 0..graph.len() {
            let instance = resolver.resolve(&node(i)).unwrap();
            prop_assert!(instance.downcast_ref::<u64>().is_some());

            let order = resolver.construction_order(&node(i)).unwrap();
            prop_assert_eq!(order.last(), Some(&node(i)));
            // every key comes after its dependencies
            for (position, key) in order.iter().enumerate() {
                let index = (0..graph.len()).find(|&n| &node(n) == key).unwrap();
                for dep in &graph[index].1 {
                    let dep_position = order.iter().position(|k| k == &node(*dep)).unwrap();
                    prop_assert!(dep_position < position);
                }
            }
        }
    }

    #[test]
    fn scope_controls_identity(graph in arb_dag()) {
        let resolver = build(&graph).unwrap();

        for (i, (scope, _)) in graph.iter().enumerate() {
            let first = resolver.resolve(&node(i)).unwrap();
            let second = resolver.resolve(&node(i)).unwrap();
            match scope {
                Scope::Singleton => prop_assert!(Arc::ptr_eq(&first, &second)),
                Scope::Unscoped => prop_assert!(!Arc::ptr_eq(&first, &second)),
            }
        }
    }

    #[test]
    fn closed_chains_report_the_cycle(length in 1usize..8) {
        let mut resolver = GraphResolver::new();
        for i in 0..length {
            let next = node((i + 1) % length);
            let binding = Binding::from_factory(Scope::Singleton, vec![next], |deps| deps.get::<u64>(0));
            resolver.register(node(i), binding).unwrap();
        }

        let mut expected = (0..length).map(node).collect::<Vec<_>>();
        expected.push(node(0));
        prop_assert_eq!(
            resolver.resolve(&node(0)).unwrap_err(),
            WiringError::CyclicDependency { path: expected }
        );
        prop_assert_eq!(resolver.cached(), 0);
    }
}
