use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::action::{TreeCommand, TreeEvent};
use crate::error::{InvariantError, SeedError};
use crate::model::{NodeId, TreeModel, TreeNode};
use crate::search::path_to_node;
use crate::seed::SeedNode;

/// Label given to nodes created by [`TreeStore::add_child`].
pub const NEW_NODE_LABEL: &str = "New Node";

/// Snapshot of the tree: id-to-node map, root id and insertion order.
///
/// Every mutation has an in-place form (`&mut self`) and a snapshot form
/// ([`TreeStore::applied`]) that leaves `self` untouched. Rejected mutations
/// (unknown ids, root deletion, blank labels) are silent no-ops.
#[derive(Clone, Debug)]
pub struct TreeStore {
    nodes: FxHashMap<NodeId, TreeNode>,
    // Insertion order; search results follow it.
    order: Vec<NodeId>,
    root: NodeId,
    // Monotonic suffix for generated ids, carried across snapshots and resets.
    next_id: u64,
}

/// Node counters for status displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub visible_count: usize,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::canonical()
    }
}

impl TreeStore {
    /// Builds a store from the canonical seed (see [`SeedNode::canonical`]).
    pub fn canonical() -> Self {
        Self::from_seed(&SeedNode::canonical())
    }

    /// Builds a store from a nested seed.
    ///
    /// Entries reusing an id that is already present are skipped together with
    /// their subtree, as are entries nested deeper than `u32::MAX` levels.
    pub fn from_seed(seed: &SeedNode) -> Self {
        Self::build(seed).0
    }

    /// Builds a store from a nested seed, rejecting duplicate or empty ids.
    pub fn try_from_seed(seed: &SeedNode) -> Result<Self, SeedError> {
        match Self::build(seed) {
            (store, None) => Ok(store),
            (_, Some(err)) => Err(err),
        }
    }

    /// Builds leniently and reports the first entry a strict build would reject.
    fn build(seed: &SeedNode) -> (Self, Option<SeedError>) {
        let capacity = seed.node_count();
        let mut store = Self {
            nodes: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            order: Vec::with_capacity(capacity),
            root: seed.id.clone(),
            next_id: 1,
        };
        let mut rejected = None;

        // Children are pushed in reverse so they pop in declaration order,
        // which keeps both `order` and each `children_ids` in pre-order.
        let mut stack: Vec<(&SeedNode, Option<NodeId>, u32)> = vec![(seed, None, 0)];
        while let Some((entry, parent, depth)) = stack.pop() {
            if entry.id.is_empty() {
                rejected.get_or_insert(SeedError::EmptyId);
            }
            if store.nodes.contains_key(&entry.id) {
                warn!(node = %entry.id, "skipping duplicate seed entry");
                rejected.get_or_insert_with(|| SeedError::DuplicateId(entry.id.clone()));
                continue;
            }

            if let Some(parent_id) = &parent
                && let Some(parent_node) = store.nodes.get_mut(parent_id)
            {
                parent_node.children_ids.push(entry.id.clone());
            }

            store.nodes.insert(
                entry.id.clone(),
                TreeNode {
                    id: entry.id.clone(),
                    label: entry.label.clone(),
                    children_ids: Vec::with_capacity(entry.children.len()),
                    parent_id: parent,
                    is_expanded: entry.is_expanded.unwrap_or(true),
                    depth,
                },
            );
            store.order.push(entry.id.clone());

            let Some(child_depth) = depth.checked_add(1) else {
                if let Some(child) = entry.children.first() {
                    warn!(node = %entry.id, "skipping seed children beyond maximum depth");
                    rejected.get_or_insert_with(|| SeedError::TooDeep(child.id.clone()));
                }
                continue;
            };
            for child in entry.children.iter().rev() {
                stack.push((child, Some(entry.id.clone()), child_depth));
            }
        }

        debug!(root = %store.root, nodes = store.len(), "built tree store from seed");
        (store, rejected)
    }

    /// Returns the root id.
    #[inline]
    pub const fn root_id(&self) -> &NodeId {
        &self.root
    }

    /// Returns the node record, if present.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Returns `true` if the node exists.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the snapshot holds no nodes (never the case for a built store).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.order.iter()
    }

    /// Node records in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Counts every descendant of the node (children, grandchildren, ...).
    pub fn count_descendants(&self, id: &str) -> usize {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        let mut count = 0;
        let mut stack: SmallVec<[&NodeId; 16]> = node.children_ids.iter().collect();
        while let Some(child) = stack.pop() {
            count += 1;
            if let Some(child_node) = self.nodes.get(child) {
                stack.extend(child_node.children_ids.iter());
            }
        }
        count
    }

    /// Summarises node counts for the given visible list.
    pub fn stats(&self, visible: &[NodeId]) -> TreeStats {
        TreeStats {
            node_count: self.len(),
            visible_count: visible.len(),
        }
    }

    /// Applies a command in place and reports what happened.
    pub fn apply(&mut self, command: &TreeCommand) -> TreeEvent {
        let event = match command {
            TreeCommand::ToggleExpand(id) => TreeEvent::from_changed(self.toggle_expand(id)),
            TreeCommand::SetExpanded(id, expanded) => {
                TreeEvent::from_changed(self.set_expanded(id, *expanded))
            }
            TreeCommand::AddChild(parent) => self
                .add_child(parent)
                .map_or(TreeEvent::Unchanged, TreeEvent::Added),
            TreeCommand::Rename(id, label) => TreeEvent::from_changed(self.rename_node(id, label)),
            TreeCommand::Delete(id) => TreeEvent::from_changed(self.delete_node(id)),
            TreeCommand::Reveal(id) => TreeEvent::from_changed(self.reveal(id)),
            TreeCommand::Reset => {
                self.reset();
                TreeEvent::Changed
            }
        };
        debug_assert!(self.check_invariants().is_ok());
        event
    }

    /// Returns a new snapshot with the command applied; `self` is left untouched.
    #[must_use]
    pub fn applied(&self, command: &TreeCommand) -> Self {
        let mut next = self.clone();
        next.apply(command);
        next
    }

    /// Flips the expansion flag of a single node.
    pub fn toggle_expand(&mut self, id: &str) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            trace!(node = id, "toggle ignored: unknown node");
            return false;
        };
        node.is_expanded = !node.is_expanded;
        debug!(node = id, expanded = node.is_expanded, "toggled node");
        true
    }

    /// Sets the expansion flag; returns `true` only if it changed.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.is_expanded != expanded => {
                node.is_expanded = expanded;
                debug!(node = id, expanded, "set node expansion");
                true
            }
            Some(_) => false,
            None => {
                trace!(node = id, "set_expanded ignored: unknown node");
                false
            }
        }
    }

    /// Expands every collapsed node on the root-first path to `id` (the node included).
    pub fn reveal(&mut self, id: &str) -> bool {
        let Some(target) = self.nodes.get(id).map(|node| node.id.clone()) else {
            trace!(node = id, "reveal ignored: unknown node");
            return false;
        };
        let path = path_to_node(self, &target);
        let mut changed = false;
        for step in &path {
            changed |= self.set_expanded(step, true);
        }
        changed
    }

    /// Appends a new collapsed child under `parent` and expands the parent.
    ///
    /// Returns the generated id, or `None` if the parent does not exist.
    pub fn add_child(&mut self, parent: &str) -> Option<NodeId> {
        let Some(parent_depth) = self.nodes.get(parent).map(|node| node.depth) else {
            trace!(parent, "add_child ignored: unknown parent");
            return None;
        };
        let Some(depth) = parent_depth.checked_add(1) else {
            trace!(parent, "add_child ignored: maximum depth reached");
            return None;
        };
        let new_id = self.generate_id();
        let parent_node = self.nodes.get_mut(parent)?;
        let parent_id = parent_node.id.clone();
        parent_node.children_ids.push(new_id.clone());
        parent_node.is_expanded = true;

        self.nodes.insert(
            new_id.clone(),
            TreeNode {
                id: new_id.clone(),
                label: NEW_NODE_LABEL.to_string(),
                children_ids: Vec::new(),
                parent_id: Some(parent_id),
                is_expanded: false,
                depth,
            },
        );
        self.order.push(new_id.clone());
        debug!(node = %new_id, parent, "added child");
        Some(new_id)
    }

    /// Replaces a node label. Blank labels are rejected; accepted labels are stored as given.
    pub fn rename_node(&mut self, id: &str, label: &str) -> bool {
        if label.trim().is_empty() {
            trace!(node = id, "rename ignored: blank label");
            return false;
        }
        let Some(node) = self.nodes.get_mut(id) else {
            trace!(node = id, "rename ignored: unknown node");
            return false;
        };
        label.clone_into(&mut node.label);
        debug!(node = id, label, "renamed node");
        true
    }

    /// Removes a node and its whole subtree. The root cannot be deleted.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let Some(node) = self.nodes.get(id) else {
            trace!(node = id, "delete ignored: unknown node");
            return false;
        };
        let Some(parent_id) = node.parent_id.clone() else {
            trace!(node = id, "delete ignored: root node");
            return false;
        };

        let closure = self.subtree_ids(id);
        for removed in &closure {
            self.nodes.remove(removed);
        }
        self.order.retain(|existing| !closure.contains(existing));
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children_ids.retain(|child| child != id);
        }
        debug!(node = id, parent = %parent_id, removed = closure.len(), "deleted subtree");
        true
    }

    /// Restores the canonical tree. Generated ids keep counting from where they were.
    pub fn reset(&mut self) {
        let next_id = self.next_id;
        *self = Self::canonical();
        self.next_id = next_id;
        debug!(nodes = self.len(), "reset tree store");
    }

    /// Collects the node and all its descendants.
    fn subtree_ids(&self, id: &str) -> FxHashSet<NodeId> {
        let mut closure = FxHashSet::default();
        let mut stack: SmallVec<[&NodeId; 16]> = SmallVec::new();
        if let Some(node) = self.nodes.get(id) {
            stack.push(&node.id);
        }
        while let Some(current) = stack.pop() {
            if !closure.insert(current.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.children_ids.iter());
            }
        }
        closure
    }

    fn generate_id(&mut self) -> NodeId {
        loop {
            let candidate = NodeId::from(format!("node-{}", self.next_id));
            self.next_id += 1;
            // Seed data may already use the `node-N` pattern.
            if !self.nodes.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Verifies the structural invariants of the snapshot.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match self.nodes.get(&self.root) {
            Some(root) if root.parent_id.is_none() && root.depth == 0 => {}
            _ => return Err(InvariantError::MissingRoot(self.root.clone())),
        }

        for node in self.nodes.values() {
            match &node.parent_id {
                None if node.id != self.root => {
                    return Err(InvariantError::MultipleRoots(node.id.clone()));
                }
                None => {}
                Some(parent_id) => {
                    let Some(parent) = self.nodes.get(parent_id) else {
                        return Err(InvariantError::ParentMismatch {
                            parent: parent_id.clone(),
                            child: node.id.clone(),
                        });
                    };
                    if !parent.children_ids.contains(&node.id) {
                        return Err(InvariantError::ParentMismatch {
                            parent: parent_id.clone(),
                            child: node.id.clone(),
                        });
                    }
                    let Some(expected) = parent.depth.checked_add(1) else {
                        return Err(InvariantError::DepthOverflow(node.id.clone()));
                    };
                    if node.depth != expected {
                        return Err(InvariantError::DepthMismatch {
                            id: node.id.clone(),
                            expected,
                            found: node.depth,
                        });
                    }
                }
            }

            let mut seen =
                FxHashSet::with_capacity_and_hasher(node.children_ids.len(), FxBuildHasher);
            for child in &node.children_ids {
                if !seen.insert(child) {
                    return Err(InvariantError::DuplicateChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
                let Some(child_node) = self.nodes.get(child) else {
                    return Err(InvariantError::DanglingChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                };
                if child_node.parent_id.as_ref() != Some(&node.id) {
                    return Err(InvariantError::ParentMismatch {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
            }
        }

        let reachable = self.subtree_ids(&self.root);
        if let Some(orphan) = self.order.iter().find(|id| !reachable.contains(*id)) {
            return Err(InvariantError::Unreachable(orphan.clone()));
        }
        if reachable.len() != self.nodes.len() || self.order.len() != self.nodes.len() {
            let missing = self
                .nodes
                .keys()
                .find(|id| !reachable.contains(*id) || !self.order.contains(*id))
                .unwrap_or(&self.root);
            return Err(InvariantError::Unreachable(missing.clone()));
        }
        Ok(())
    }
}

impl TreeModel for TreeStore {
    type Id = NodeId;

    fn root(&self) -> Option<&NodeId> {
        self.nodes.contains_key(&self.root).then_some(&self.root)
    }

    fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children_ids.as_slice())
            .unwrap_or(&[])
    }

    fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.nodes.get(id).and_then(|node| node.parent_id.as_ref())
    }

    fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    fn is_expanded(&self, id: &NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.is_expanded)
    }

    fn size_hint(&self) -> usize {
        self.nodes.len()
    }
}
