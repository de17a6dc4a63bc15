//! Identity-addressed tree with structural editing operations.
//!
//! Nodes live in a generational arena; callers address them by [`NodeId`],
//! which is stable for the lifetime of the tree and never reused.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::attributes::NodeAttributes;
use crate::domain::error::{DomainError, DomainResult};

/// Identity of a node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    pub attributes: NodeAttributes,
    /// Owning node, None for the root
    pub parent: Option<NodeId>,
    /// Ordered children, left to right
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub(crate) fn new(id: NodeId, attributes: NodeAttributes) -> Self {
        Self {
            id,
            attributes,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed tree that owns all of its nodes.
///
/// The id index always covers exactly the nodes reachable from the root.
/// `Clone` is a deep copy: edits on a clone never show up in the original.
#[derive(Debug, Clone)]
pub struct Tree {
    arena: Arena<TreeNode>,
    index: BTreeMap<NodeId, Index>,
    root: NodeId,
    next_id: u64,
}

impl Tree {
    /// Single-node tree whose root has id 0.
    pub fn new(root_attributes: NodeAttributes) -> Self {
        let mut tree = Self {
            arena: Arena::new(),
            index: BTreeMap::new(),
            root: NodeId(0),
            next_id: 0,
        };
        tree.insert(TreeNode::new(NodeId(0), root_attributes));
        tree
    }

    /// Assemble a tree from already linked nodes.
    ///
    /// The caller guarantees that `nodes` is exactly the set reachable from
    /// `root` and that parent/children links agree.
    pub(crate) fn from_linked_nodes(root: NodeId, nodes: Vec<TreeNode>, next_id: u64) -> Self {
        let mut tree = Self {
            arena: Arena::with_capacity(nodes.len()),
            index: BTreeMap::new(),
            root,
            next_id,
        };
        for node in nodes {
            tree.insert(node);
        }
        tree
    }

    fn insert(&mut self, node: TreeNode) {
        let id = node.id;
        let idx = self.arena.insert(node);
        self.index.insert(id, idx);
    }

    fn slot(&self, id: NodeId) -> DomainResult<Index> {
        self.index
            .get(&id)
            .copied()
            .ok_or(DomainError::NodeNotFound(id))
    }

    fn node(&self, id: NodeId) -> DomainResult<&TreeNode> {
        let idx = self.slot(id)?;
        self.arena.get(idx).ok_or(DomainError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomainResult<&mut TreeNode> {
        let idx = self.slot(id)?;
        self.arena.get_mut(idx).ok_or(DomainError::NodeNotFound(id))
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &TreeNode {
        &self.arena[self.index[&self.root]]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.node(id).ok()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn children(&self, id: NodeId) -> DomainResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn parent(&self, id: NodeId) -> DomainResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Last id handed out; the next `add_node` uses `next_id() + 1`.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// All node ids in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.index.keys().copied().collect()
    }

    /// Append a new node labelled `value` as the last child of `parent`.
    #[instrument(level = "debug", skip(self, value))]
    pub fn add_node(&mut self, parent: NodeId, value: impl Into<String>) -> DomainResult<NodeId> {
        self.slot(parent)?;

        let next = self
            .next_id
            .checked_add(1)
            .ok_or(DomainError::IdSpaceExhausted(NodeId(self.next_id)))?;
        self.next_id = next;
        let id = NodeId(next);
        let mut node = TreeNode::new(id, NodeAttributes::with_value(value));
        node.parent = Some(parent);
        self.insert(node);
        self.node_mut(parent)?.children.push(id);

        debug!("added node {} under {}", id, parent);
        Ok(id)
    }

    /// Remove a node together with its whole subtree.
    ///
    /// Removing the root collapses the tree to the root alone.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_node(&mut self, id: NodeId) -> DomainResult<()> {
        let parent = self.node(id)?.parent;

        match parent {
            Some(parent_id) => {
                let doomed = self.subtree_ids(id)?;
                self.node_mut(parent_id)?.children.retain(|&c| c != id);
                for node_id in &doomed {
                    if let Some(idx) = self.index.remove(node_id) {
                        self.arena.remove(idx);
                    }
                }
                debug!("removed {} nodes under {}", doomed.len(), parent_id);
            }
            None => {
                let idx = self.slot(id)?;
                let mut root = self
                    .arena
                    .remove(idx)
                    .ok_or(DomainError::NodeNotFound(id))?;
                root.children.clear();
                self.arena.clear();
                self.index.clear();
                self.root = root.id;
                self.insert(root);
                debug!("cleared tree down to root {}", id);
            }
        }
        Ok(())
    }

    /// Mirror the subtree rooted at `id` in place.
    #[instrument(level = "debug", skip(self))]
    pub fn invert_subtree(&mut self, id: NodeId) -> DomainResult<()> {
        for node_id in self.subtree_ids(id)? {
            self.node_mut(node_id)?.children.reverse();
        }
        Ok(())
    }

    /// Rotate the sibling row containing `id`: the first sibling moves to the end.
    #[instrument(level = "debug", skip(self))]
    pub fn shift_left(&mut self, id: NodeId) -> DomainResult<()> {
        if let Some(siblings) = self.sibling_row(id)? {
            siblings.rotate_left(1);
        }
        Ok(())
    }

    /// Rotate the sibling row containing `id`: the last sibling moves to the front.
    #[instrument(level = "debug", skip(self))]
    pub fn shift_right(&mut self, id: NodeId) -> DomainResult<()> {
        if let Some(siblings) = self.sibling_row(id)? {
            siblings.rotate_right(1);
        }
        Ok(())
    }

    /// Children list of `id`'s parent, or None for the root and only children.
    fn sibling_row(&mut self, id: NodeId) -> DomainResult<Option<&mut Vec<NodeId>>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        let siblings = &mut self.node_mut(parent)?.children;
        if siblings.len() < 2 {
            return Ok(None);
        }
        Ok(Some(siblings))
    }

    /// Replace the attributes of `id` wholesale.
    #[instrument(level = "debug", skip(self, attributes))]
    pub fn update_node(&mut self, id: NodeId, attributes: NodeAttributes) -> DomainResult<()> {
        self.node_mut(id)?.attributes = attributes;
        Ok(())
    }

    /// Level-order traversal from `id`, one inner vector per depth.
    #[instrument(level = "trace", skip(self))]
    pub fn bfs(&self, id: NodeId) -> DomainResult<Vec<Vec<NodeId>>> {
        self.slot(id)?;

        let mut levels: Vec<Vec<NodeId>> = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back((id, 0usize)); // (node, depth)

        while let Some((node_id, depth)) = queue.pop_front() {
            if levels.len() <= depth {
                levels.push(Vec::new());
            }
            levels[depth].push(node_id);
            for &child in &self.node(node_id)?.children {
                queue.push_back((child, depth + 1));
            }
        }

        Ok(levels)
    }

    /// `id` and all of its descendants, in level order.
    pub fn subtree_ids(&self, id: NodeId) -> DomainResult<Vec<NodeId>> {
        Ok(self.bfs(id)?.into_iter().flatten().collect())
    }

    /// Number of levels below and including the root.
    pub fn depth(&self) -> usize {
        self.bfs(self.root).map(|levels| levels.len()).unwrap_or(0)
    }

    /// Leaf ids in left-to-right order.
    pub fn leaf_ids(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.id)
            .collect()
    }

    /// Pre-order, left-to-right traversal from the root.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Post-order traversal: children before their parent.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }
}

/// Structural equality: same root, ids, attributes and child order.
/// The id counter is not compared.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.node_count() == other.node_count()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.id == b.id && a.attributes == b.attributes && a.children == b.children)
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a TreeNode;
    type IntoIter = TreeIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                if visited {
                    return Some(node);
                }
                self.stack.push((current, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
