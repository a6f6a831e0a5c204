//! Property-based checks on graph invariants across every stage.

use std::collections::BTreeMap;

use proptest::prelude::*;
use storygraph::prune::remove_below_degree;
use storygraph::{
    combine, EdgeAttrs, EntityResolver, KnowledgeGraph, NodeAttrs, PruneConfig, Pruner, SourceTag, Triple,
};

const KEYS: &[&str] = &[
    "Garda", "Gardaí", "Tuam", "the Tuam site", "boys", "Mozambique", "Mozambiqe",
    "Malawi", "aid", "cyclone", "Tuesday", "residents",
];
const RELATIONS: &[&str] = &["hit", "arrest", "flee_in", "send"];

fn triple() -> impl Strategy<Value = Triple> {
    (
        prop::sample::select(KEYS),
        prop::sample::select(RELATIONS),
        prop::sample::select(KEYS),
    )
        .prop_map(|(s, r, o)| Triple::new(s, r, o))
}

fn build(triples: &[Triple]) -> KnowledgeGraph {
    let mut g = KnowledgeGraph::new();
    for t in triples {
        g.apply_triple(t, NodeAttrs::new(), NodeAttrs::new(), EdgeAttrs::new());
    }
    g
}

fn edge_set(g: &KnowledgeGraph) -> Vec<(String, String, Vec<String>)> {
    g.edges()
        .map(|e| (e.from.to_string(), e.to.to_string(), e.attrs().relations.iter().cloned().collect()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn accumulation_keeps_integrity(triples in prop::collection::vec(triple(), 0..40)) {
        let g = build(&triples);
        prop_assert!(g.check_integrity().is_ok());
        prop_assert_eq!(g.triples().len(), triples.len());
    }

    #[test]
    fn accumulation_is_idempotent(triples in prop::collection::vec(triple(), 0..30)) {
        let once = build(&triples);
        let doubled: Vec<Triple> = triples.iter().chain(triples.iter()).cloned().collect();
        let twice = build(&doubled);

        prop_assert_eq!(once.keys().collect::<Vec<_>>(), twice.keys().collect::<Vec<_>>());
        prop_assert_eq!(edge_set(&once), edge_set(&twice));
    }

    #[test]
    fn min_degree_is_monotone(triples in prop::collection::vec(triple(), 0..40), min in 0usize..4) {
        let mut g = build(&triples);
        let (nodes, edges) = (g.node_count(), g.edge_count());

        remove_below_degree(&mut g, min);

        prop_assert!(g.node_count() <= nodes);
        prop_assert!(g.edge_count() <= edges);
        for key in g.keys() {
            prop_assert!(g.degree(key) >= min);
        }
        prop_assert!(g.check_integrity().is_ok());
    }

    #[test]
    fn pruning_leaves_no_dangling_triples(
        triples in prop::collection::vec(triple(), 0..40),
        largest in any::<bool>(),
    ) {
        let mut g = build(&triples);
        let config = PruneConfig { largest_component: largest, ..PruneConfig::default() };
        Pruner::new(&config).unwrap().prune(&mut g);

        prop_assert!(g.check_integrity().is_ok());
        prop_assert!(!g.contains("Tuesday"));
        for t in g.triples() {
            prop_assert!(g.contains(&t.subject) && g.contains(&t.object));
        }
    }

    #[test]
    fn resolution_is_deterministic(triples in prop::collection::vec(triple(), 0..40)) {
        let mut a = build(&triples);
        let mut b = a.clone();

        let ra = EntityResolver::new(0.8).resolve(&mut a);
        let rb = EntityResolver::new(0.8).resolve(&mut b);

        prop_assert_eq!(&ra, &rb);
        prop_assert_eq!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());
        prop_assert_eq!(edge_set(&a), edge_set(&b));
        prop_assert!(a.check_integrity().is_ok());

        // removed keys are gone and point at a live survivor
        for (removed, _) in ra.canonical_map.iter() {
            prop_assert!(!a.contains(removed));
            prop_assert!(a.contains(ra.canonical_map.canonical(removed)));
        }
    }

    #[test]
    fn combined_provenance_is_subset_of_tags(
        left in prop::collection::vec(triple(), 0..20),
        right in prop::collection::vec(triple(), 0..20),
    ) {
        let mut map = BTreeMap::new();
        map.insert(SourceTag::language("en"), build(&left));
        map.insert(SourceTag::language("de"), build(&right));
        let combined = combine(&map);

        prop_assert!(combined.check_integrity().is_ok());
        for node in combined.nodes() {
            prop_assert!(!node.attrs.sources.is_empty());
            prop_assert!(node.attrs.sources.iter().all(|t| map.contains_key(t)));
        }
        for e in combined.edges() {
            prop_assert!(!e.attrs().sources.is_empty());
        }
        let expected = map.values().flat_map(|g| g.keys()).collect::<std::collections::BTreeSet<_>>();
        prop_assert_eq!(combined.node_count(), expected.len());
    }
}
