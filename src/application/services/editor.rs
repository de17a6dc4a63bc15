//! Tree editing service
//!
//! Holds the current tree and settings and persists every accepted edit.
//! Each edit runs on a fresh copy of the tree; the copy replaces the current
//! tree only after the operation succeeded and the store accepted it.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    generate_random_tree, DomainResult, NodeAttributes, NodeId, SavedData, Tree, TreeDocument,
    TreeSettings,
};
use crate::infrastructure::traits::DocumentStore;

/// Service for editing a persisted tree.
pub struct EditorService {
    store: Arc<dyn DocumentStore>,
    tree: Tree,
    settings: TreeSettings,
}

impl EditorService {
    /// Load the stored tree, or start from a single `root_value` node.
    ///
    /// A stored document that cannot be parsed or rebuilt is replaced by a
    /// fresh tree, and invalid stored settings by the defaults (both with a
    /// warning); store I/O failures are returned.
    #[instrument(level = "debug", skip(store))]
    pub fn open(store: Arc<dyn DocumentStore>, root_value: &str) -> ApplicationResult<Self> {
        let (tree, settings) = match store.load() {
            Ok(Some(data)) => {
                let settings = match data.tree_settings.validate() {
                    Ok(()) => data.tree_settings,
                    Err(e) => {
                        warn!("stored settings are invalid, using defaults: {}", e);
                        TreeSettings::default()
                    }
                };
                match Tree::from_document(data.tree) {
                    Ok(tree) => (tree, settings),
                    Err(e) => {
                        warn!("stored tree is unusable, starting fresh: {}", e);
                        (Self::fresh_tree(root_value), settings)
                    }
                }
            }
            Ok(None) => (Self::fresh_tree(root_value), TreeSettings::default()),
            Err(ApplicationError::Domain(e)) => {
                warn!("stored data is unreadable, starting fresh: {}", e);
                (Self::fresh_tree(root_value), TreeSettings::default())
            }
            Err(e) => return Err(e),
        };
        debug!("opened tree with {} nodes", tree.node_count());
        Ok(Self {
            store,
            tree,
            settings,
        })
    }

    fn fresh_tree(root_value: &str) -> Tree {
        Tree::new(NodeAttributes::with_value(root_value))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    /// Current tree in document form.
    pub fn document(&self) -> TreeDocument {
        self.tree.to_document()
    }

    /// Run `op` on a copy of the tree and commit the copy if it succeeds.
    fn edit<T>(&mut self, op: impl FnOnce(&mut Tree) -> DomainResult<T>) -> ApplicationResult<T> {
        let mut next = self.tree.clone();
        let out = op(&mut next)?;
        self.commit(next, self.settings.clone())?;
        Ok(out)
    }

    fn commit(&mut self, tree: Tree, settings: TreeSettings) -> ApplicationResult<()> {
        self.store
            .save(&SavedData::new(tree.to_document(), settings.clone()))?;
        self.tree = tree;
        self.settings = settings;
        Ok(())
    }

    pub fn add_node(&mut self, parent: NodeId, value: &str) -> ApplicationResult<NodeId> {
        let id = self.edit(|tree| tree.add_node(parent, value))?;
        info!("added node {} under {}", id, parent);
        Ok(id)
    }

    pub fn remove_node(&mut self, id: NodeId) -> ApplicationResult<()> {
        self.edit(|tree| tree.remove_node(id))?;
        info!("removed node {}", id);
        Ok(())
    }

    pub fn invert_subtree(&mut self, id: NodeId) -> ApplicationResult<()> {
        self.edit(|tree| tree.invert_subtree(id))
    }

    pub fn shift_left(&mut self, id: NodeId) -> ApplicationResult<()> {
        self.edit(|tree| tree.shift_left(id))
    }

    pub fn shift_right(&mut self, id: NodeId) -> ApplicationResult<()> {
        self.edit(|tree| tree.shift_right(id))
    }

    pub fn update_node(&mut self, id: NodeId, attributes: NodeAttributes) -> ApplicationResult<()> {
        self.edit(|tree| tree.update_node(id, attributes))
    }

    /// Replace the whole tree, keeping the settings.
    pub fn replace_tree(&mut self, tree: Tree) -> ApplicationResult<()> {
        self.commit(tree, self.settings.clone())
    }

    /// Replace the tree with a single `root_value` node.
    pub fn reset(&mut self, root_value: &str) -> ApplicationResult<()> {
        self.replace_tree(Self::fresh_tree(root_value))
    }

    /// Replace the tree with a random one of `size` nodes.
    pub fn generate_random(&mut self, size: usize) -> ApplicationResult<()> {
        let tree = generate_random_tree(size)?;
        info!("generated random tree with {} nodes", tree.node_count());
        self.replace_tree(tree)
    }

    /// Replace the tree with one rebuilt from `doc`.
    pub fn import_document(&mut self, doc: TreeDocument) -> ApplicationResult<()> {
        let tree = Tree::from_document(doc)?;
        self.replace_tree(tree)
    }

    pub fn update_settings(&mut self, settings: TreeSettings) -> ApplicationResult<()> {
        settings.validate()?;
        self.commit(self.tree.clone(), settings)
    }
}
