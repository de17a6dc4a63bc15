//! Flat, id-referenced document form of a tree.
//!
//! A [`TreeDocument`] lists every reachable node once, with children given
//! as ordered id lists instead of nesting. This is the persisted JSON shape:
//!
//! ```json
//! { "rootId": 0, "nodes": [ { "id": 0, "attributes": { ... }, "childrenIds": [1, 2] } ] }
//! ```

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::attributes::NodeAttributes;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{NodeId, Tree, TreeNode};

/// One node of a [`TreeDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntry {
    pub id: NodeId,
    pub attributes: NodeAttributes,
    pub children_ids: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDocument {
    pub root_id: NodeId,
    pub nodes: Vec<NodeEntry>,
}

impl TreeDocument {
    pub fn from_json(json: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DomainResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> DomainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Tree {
    /// Flatten into a document, nodes in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn to_document(&self) -> TreeDocument {
        let nodes: Vec<NodeEntry> = self
            .iter()
            .map(|node| NodeEntry {
                id: node.id,
                attributes: node.attributes.clone(),
                children_ids: node.children.clone(),
            })
            .collect();
        debug!("serialized {} nodes", nodes.len());
        TreeDocument {
            root_id: self.root_id(),
            nodes,
        }
    }

    /// Rebuild a tree from a document.
    ///
    /// Rejects documents whose root entry is missing, whose ids repeat, or
    /// whose child lists dangle, share a child, or point back at the root.
    /// Entries not reachable from the root are dropped.
    #[instrument(level = "debug", skip(doc), fields(root_id = %doc.root_id, entries = doc.nodes.len()))]
    pub fn from_document(doc: TreeDocument) -> DomainResult<Tree> {
        let root_id = doc.root_id;
        let next_id = doc.nodes.iter().map(|entry| entry.id.0).max().unwrap_or(0);

        // Pass 1: bare nodes, no links yet
        let mut nodes: BTreeMap<NodeId, TreeNode> = BTreeMap::new();
        let mut child_lists: Vec<(NodeId, Vec<NodeId>)> = Vec::with_capacity(doc.nodes.len());
        for entry in doc.nodes {
            if nodes.contains_key(&entry.id) {
                return Err(DomainError::malformed(format!("duplicate node id {}", entry.id)));
            }
            nodes.insert(entry.id, TreeNode::new(entry.id, entry.attributes));
            child_lists.push((entry.id, entry.children_ids));
        }

        if !nodes.contains_key(&root_id) {
            return Err(DomainError::malformed(format!(
                "root id {} has no node entry",
                root_id
            )));
        }

        // Pass 2: resolve child ids, recording each child's single parent
        for (parent_id, children) in child_lists {
            for &child_id in &children {
                if child_id == root_id {
                    return Err(DomainError::malformed(format!(
                        "node {} lists the root {} as a child",
                        parent_id, root_id
                    )));
                }
                let child = nodes.get_mut(&child_id).ok_or_else(|| {
                    DomainError::malformed(format!(
                        "node {} references missing child {}",
                        parent_id, child_id
                    ))
                })?;
                if let Some(existing) = child.parent {
                    return Err(DomainError::malformed(format!(
                        "node {} is a child of both {} and {}",
                        child_id, existing, parent_id
                    )));
                }
                child.parent = Some(parent_id);
            }
            if let Some(parent) = nodes.get_mut(&parent_id) {
                parent.children = children;
            }
        }

        let reachable = reachable_from(root_id, &nodes);
        if reachable.len() < nodes.len() {
            let dropped: Vec<String> = nodes
                .keys()
                .filter(|id| !reachable.contains(id))
                .map(|id| id.to_string())
                .collect();
            warn!(
                "dropping {} node(s) unreachable from root {}: {}",
                dropped.len(),
                root_id,
                dropped.join(", ")
            );
            nodes.retain(|id, _| reachable.contains(id));
        }

        Ok(Tree::from_linked_nodes(
            root_id,
            nodes.into_values().collect(),
            next_id,
        ))
    }
}

fn reachable_from(root: NodeId, nodes: &BTreeMap<NodeId, TreeNode>) -> HashSet<NodeId> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([root]);
    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        if let Some(node) = nodes.get(&id) {
            queue.extend(node.children.iter().copied());
        }
    }
    seen
}

impl From<&Tree> for TreeDocument {
    fn from(tree: &Tree) -> Self {
        tree.to_document()
    }
}

impl TryFrom<TreeDocument> for Tree {
    type Error = DomainError;

    fn try_from(doc: TreeDocument) -> Result<Self, Self::Error> {
        Tree::from_document(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn three_node_tree() -> Tree {
        let mut tree = Tree::new(NodeAttributes::with_value("root"));
        let root = tree.root_id();
        tree.add_node(root, "left").unwrap();
        tree.add_node(root, "right").unwrap();
        tree
    }

    fn entry(id: u64, children: &[u64]) -> NodeEntry {
        NodeEntry {
            id: NodeId(id),
            attributes: NodeAttributes::with_value(format!("n{id}")),
            children_ids: children.iter().copied().map(NodeId).collect(),
        }
    }

    fn doc(root: u64, nodes: Vec<NodeEntry>) -> TreeDocument {
        TreeDocument {
            root_id: NodeId(root),
            nodes,
        }
    }

    #[test]
    fn given_three_node_tree_when_serializing_then_emits_flat_json() {
        let json: serde_json::Value =
            serde_json::from_str(&three_node_tree().to_document().to_json().unwrap()).unwrap();

        assert_eq!(json["rootId"], 0);
        let nodes = json["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        let root = nodes.iter().find(|n| n["id"] == 0).unwrap();
        assert_eq!(root["childrenIds"], json!([1, 2]));
        assert_eq!(root["attributes"]["value"], "root");
    }

    #[test]
    fn given_tree_when_round_tripping_then_structure_is_equal() {
        let mut tree = three_node_tree();
        let left = NodeId(1);
        tree.add_node(left, "leaf").unwrap();
        tree.invert_subtree(tree.root_id()).unwrap();

        let json = tree.to_document().to_json().unwrap();
        let restored = Tree::from_document(TreeDocument::from_json(&json).unwrap()).unwrap();

        assert_eq!(restored, tree);
        assert_eq!(restored.next_id(), tree.next_id());
        assert_eq!(restored.parent(NodeId(3)).unwrap(), Some(left));
    }

    #[test]
    fn given_sparse_ids_when_deserializing_then_next_id_is_max_id() {
        let mut tree = three_node_tree();
        tree.remove_node(NodeId(1)).unwrap();
        // ids {0, 2}: a dense-id assumption would restore next_id = 1

        let mut restored = Tree::from_document(tree.to_document()).unwrap();
        assert_eq!(restored.next_id(), 2);
        let fresh = restored.add_node(restored.root_id(), "fresh").unwrap();
        assert_eq!(fresh, NodeId(3));
    }

    #[test]
    fn given_non_zero_root_when_deserializing_then_root_follows_root_id() {
        let tree = Tree::from_document(doc(7, vec![entry(3, &[]), entry(7, &[3])])).unwrap();
        assert_eq!(tree.root_id(), NodeId(7));
        assert_eq!(tree.root().children, vec![NodeId(3)]);
        assert_eq!(tree.next_id(), 7);
    }

    #[test]
    fn given_missing_root_when_deserializing_then_rejects() {
        let result = Tree::from_document(doc(9, vec![entry(0, &[])]));
        assert!(matches!(result, Err(DomainError::Deserialization { .. })));
    }

    #[test]
    fn given_dangling_child_when_deserializing_then_rejects() {
        let result = Tree::from_document(doc(0, vec![entry(0, &[1, 5]), entry(1, &[])]));
        assert!(matches!(result, Err(DomainError::Deserialization { message }) if message.contains('5')));
    }

    #[test]
    fn given_duplicate_ids_when_deserializing_then_rejects() {
        let result = Tree::from_document(doc(0, vec![entry(0, &[1]), entry(1, &[]), entry(1, &[])]));
        assert!(matches!(result, Err(DomainError::Deserialization { .. })));
    }

    #[test]
    fn given_shared_child_when_deserializing_then_rejects() {
        let result = Tree::from_document(doc(
            0,
            vec![entry(0, &[1, 2]), entry(1, &[3]), entry(2, &[3]), entry(3, &[])],
        ));
        assert!(matches!(result, Err(DomainError::Deserialization { .. })));
    }

    #[test]
    fn given_cycle_through_root_when_deserializing_then_rejects() {
        let result = Tree::from_document(doc(0, vec![entry(0, &[1]), entry(1, &[0])]));
        assert!(matches!(result, Err(DomainError::Deserialization { .. })));
    }

    #[test]
    fn given_unreachable_entries_when_deserializing_then_drops_them() {
        // 4 <-> 5 is a detached cycle
        let tree = Tree::from_document(doc(
            0,
            vec![entry(0, &[1]), entry(1, &[]), entry(4, &[5]), entry(5, &[4])],
        ))
        .unwrap();

        assert_eq!(tree.node_ids(), vec![NodeId(0), NodeId(1)]);
        assert_eq!(tree.next_id(), 5);
    }

    #[test]
    fn given_invalid_json_when_parsing_then_reports_json_error() {
        assert!(matches!(
            TreeDocument::from_json("{\"rootId\": 0"),
            Err(DomainError::Json(_))
        ));
    }

    #[test]
    fn given_max_id_in_document_when_adding_then_reports_exhausted_ids() {
        let mut tree = Tree::from_document(doc(u64::MAX, vec![entry(u64::MAX, &[])])).unwrap();
        let before = tree.clone();

        let result = tree.add_node(NodeId(u64::MAX), "x");

        assert!(matches!(
            result,
            Err(DomainError::IdSpaceExhausted(NodeId(u64::MAX)))
        ));
        assert_eq!(tree, before);
        assert_eq!(tree.next_id(), u64::MAX);
    }

    #[test]
    fn given_max_id_beside_id_zero_when_adding_then_index_stays_intact() {
        let mut tree =
            Tree::from_document(doc(0, vec![entry(0, &[u64::MAX]), entry(u64::MAX, &[])]))
                .unwrap();

        assert!(tree.add_node(NodeId(0), "x").is_err());

        assert_eq!(tree.node_ids(), vec![NodeId(0), NodeId(u64::MAX)]);
        assert_eq!(tree.root().attributes.value, "n0");
    }
}
