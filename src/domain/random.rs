//! Random tree generation for demos and tests.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::domain::attributes::NodeAttributes;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::Tree;

/// Labels drawn from when generating nodes.
pub const WORDS: &[&str] = &[
    "apple", "banana", "cherry", "delta", "echo", "falcon", "garnet", "harbor", "iris",
    "juniper", "kernel", "lantern", "maple", "nectar", "orbit", "pepper", "quartz", "raven",
    "saffron", "tundra", "umber", "velvet", "willow", "xenon", "yarrow", "zephyr",
];

const MAX_CHILDREN: usize = 3;

/// Build a tree of exactly `size` nodes using the thread-local RNG.
pub fn generate_random_tree(size: usize) -> DomainResult<Tree> {
    generate_random_tree_with(size, &mut rand::thread_rng())
}

/// Build a tree of exactly `size` nodes, expanding breadth first.
///
/// Each dequeued node gets 1..=3 children (never exceeding the budget); the
/// new children are enqueued in shuffled order so branching varies.
#[instrument(level = "debug", skip(rng))]
pub fn generate_random_tree_with<R: Rng + ?Sized>(size: usize, rng: &mut R) -> DomainResult<Tree> {
    if size == 0 {
        return Err(DomainError::InvalidTreeSize(size));
    }

    let mut tree = Tree::new(NodeAttributes::with_value(random_word(rng)));
    let mut remaining = size - 1;
    let mut queue = VecDeque::from([tree.root_id()]);

    while remaining > 0 {
        let Some(parent) = queue.pop_front() else {
            break;
        };
        let count = rng.gen_range(1..=MAX_CHILDREN).min(remaining);
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            children.push(tree.add_node(parent, random_word(rng))?);
        }
        remaining -= count;

        children.shuffle(rng);
        queue.extend(children);
    }

    debug!("generated tree: {} nodes, depth {}", tree.node_count(), tree.depth());
    Ok(tree)
}

fn random_word<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("node")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn given_size_ten_when_generating_then_has_ten_reachable_nodes() {
        let tree = generate_random_tree(10).unwrap();
        assert_eq!(tree.node_count(), 10);
        let visited: usize = tree.bfs(tree.root_id()).unwrap().iter().map(Vec::len).sum();
        assert_eq!(visited, 10);
    }

    #[test]
    fn given_size_one_when_generating_then_returns_lone_root() {
        let tree = generate_random_tree(1).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn given_size_zero_when_generating_then_rejects() {
        assert!(matches!(
            generate_random_tree(0),
            Err(DomainError::InvalidTreeSize(0))
        ));
    }

    #[test]
    fn given_seeded_rng_when_generating_then_respects_branching_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let tree = generate_random_tree_with(200, &mut rng).unwrap();

        assert_eq!(tree.node_count(), 200);
        for node in tree.iter() {
            assert!(node.children.len() <= MAX_CHILDREN);
            assert!(WORDS.contains(&node.attributes.value.as_str()));
        }
    }

    #[test]
    fn given_same_seed_when_generating_then_output_is_identical() {
        let a = generate_random_tree_with(30, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = generate_random_tree_with(30, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
