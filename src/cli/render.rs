/*
Text rendering of the live tree for the terminal.
Only reads node attributes; the tree is never modified here.
 */
use termtree::Tree as TextTree;

use crate::domain::{ArrowType, LineAttributes, NodeId, Tree, TreeNode};

pub trait ToTextTree {
    fn to_text_tree(&self, show_ids: bool) -> TextTree<String>;
}

impl ToTextTree for Tree {
    fn to_text_tree(&self, show_ids: bool) -> TextTree<String> {
        fn build(tree: &Tree, id: NodeId, show_ids: bool) -> TextTree<String> {
            match tree.get(id) {
                Some(node) => {
                    let leaves: Vec<_> = node
                        .children
                        .iter()
                        .map(|&child| build(tree, child, show_ids))
                        .collect();
                    TextTree::new(label(node, show_ids)).with_leaves(leaves)
                }
                None => TextTree::new(format!("<missing {}>", id)),
            }
        }

        build(self, self.root_id(), show_ids)
    }
}

fn label(node: &TreeNode, show_ids: bool) -> String {
    let mut out = if node.attributes.value.is_empty() {
        "(empty)".to_string()
    } else {
        node.attributes.value.clone()
    };
    if show_ids {
        out.push_str(&format!(" [#{}]", node.id));
    }
    // the root has no incoming edge to style
    if node.parent.is_some() && !node.attributes.line_attributes.is_default() {
        out.push_str(&format!(" ({})", line_style(&node.attributes.line_attributes)));
    }
    out
}

fn line_style(line: &LineAttributes) -> String {
    let mut parts = vec![format!("line {}", line.line_color)];
    if line.dashed_line {
        parts.push("dashed".into());
    }
    if line.arrow_type != ArrowType::None {
        parts.push(format!("arrow {}", line.arrow_type));
    }
    parts.join(", ")
}
