//! Domain layer: the tree model and its document form
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod attributes;
pub mod document;
pub mod entities;
pub mod error;
pub mod random;
pub mod tree;

pub use attributes::{ArrowType, Color, LineAttributes, NodeAttributes};
pub use document::{NodeEntry, TreeDocument};
pub use entities::{SavedData, TreeSettings};
pub use error::{DomainError, DomainResult};
pub use random::{generate_random_tree, generate_random_tree_with};
pub use tree::{NodeId, PostOrderIterator, Tree, TreeIterator, TreeNode};
