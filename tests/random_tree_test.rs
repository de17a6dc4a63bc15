//! Integration tests for random tree generation.
//!
//! Shapes are random; only structural invariants are asserted.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

use treedraw::domain::{generate_random_tree, generate_random_tree_with, DomainError, Tree};

fn assert_well_formed(tree: &Tree, size: usize) {
    let levels = tree.bfs(tree.root_id()).unwrap();
    let visited: Vec<_> = levels.iter().flatten().copied().collect();
    let unique: HashSet<_> = visited.iter().copied().collect();

    assert_eq!(visited.len(), size, "bfs must visit every node exactly once");
    assert_eq!(unique.len(), size);
    assert_eq!(tree.node_count(), size);
    assert_eq!(tree.node_ids(), {
        let mut ids: Vec<_> = unique.into_iter().collect();
        ids.sort();
        ids
    });
    for node in tree.iter() {
        assert!(node.children.len() <= 3, "node {} has too many children", node.id);
        assert!(!node.attributes.value.is_empty());
    }
}

#[test]
fn given_ten_when_generating_then_has_ten_reachable_nodes_and_no_cycles() {
    let tree = generate_random_tree(10).unwrap();
    assert_well_formed(&tree, 10);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
#[case(37)]
#[case(250)]
fn given_size_when_generating_then_tree_has_exactly_that_many_nodes(#[case] size: usize) {
    for seed in 0..20 {
        let tree = generate_random_tree_with(size, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert_well_formed(&tree, size);
    }
}

#[test]
fn given_zero_when_generating_then_rejects_size() {
    assert!(matches!(
        generate_random_tree(0),
        Err(DomainError::InvalidTreeSize(0))
    ));
}

#[test]
fn given_same_seed_when_generating_then_produces_same_tree() {
    let a = generate_random_tree_with(30, &mut StdRng::seed_from_u64(7)).unwrap();
    let b = generate_random_tree_with(30, &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn given_generated_tree_when_editing_then_new_ids_do_not_collide() {
    let mut tree = generate_random_tree(12).unwrap();
    let existing: HashSet<_> = tree.node_ids().into_iter().collect();

    let id = tree.add_node(tree.root_id(), "extra").unwrap();

    assert!(!existing.contains(&id));
    assert_eq!(tree.node_count(), 13);
}
