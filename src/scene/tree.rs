//! Arena-backed render tree.
//!
//! Nodes live in slots addressed by [`NodeId`]. A node is *attached* when it
//! is reachable from one of the tree's roots; only attached nodes count
//! towards [`RenderTree::node_count`]. Detaching a root releases its whole
//! subtree.

use super::style::Style;
use crate::draw::{Color, FontDescriptor, color::GRAY_900};

/// Font size used when no ancestor sets one.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node represents in the visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Generic box grouping other nodes.
    Container,
    /// Plain run of text.
    Text,
    /// One token rendered as a chip.
    Chip,
    /// Interactive control (buttons, toggles). Never part of an exported artifact.
    Control,
    /// Container holding the variant chips of a card.
    VariantList,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub role: Role,
    pub text: Option<String>,
    pub style: Style,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(role: Role, style: Style) -> Self {
        Self {
            role,
            text: None,
            style,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(role: Role, text: impl Into<String>, style: Style) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(role, style)
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node renders a non-empty run of text.
    pub fn is_text_bearing(&self) -> bool {
        self.text.as_deref().is_some_and(|text| !text.is_empty())
    }
}

/// Detached copy of a subtree, owned independently of the tree it came from.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub tree: RenderTree,
    pub root: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct RenderTree {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    roots: Vec<NodeId>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node without attaching it anywhere.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Inserts `node` and appends it as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.insert(node);
        self.append_child(parent, id);
        id
    }

    /// Moves `child` under `parent`. Ignores unknown ids and attempts to
    /// create cycles.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            log::warn!("append_child ignored for {:?} -> {:?}", parent, child);
            return;
        }
        if self.ancestors(parent).contains(&child) {
            log::warn!("append_child would create a cycle at {:?}", child);
            return;
        }
        self.unlink(child);
        self.roots.retain(|root| *root != child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Roots that are shown on the page (off-screen containers excluded).
    pub fn visible_roots(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .copied()
            .filter(|id| self.get(*id).is_some_and(|node| !node.style.offscreen))
            .collect()
    }

    /// Makes a parentless node a top-level root of the tree.
    pub fn attach_root(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.parent.is_some() || self.roots.contains(&id) {
            return;
        }
        self.roots.push(id);
    }

    /// Removes a root and releases its subtree. Returns `false` when `id` was not a root.
    pub fn detach_root(&mut self, id: NodeId) -> bool {
        let before = self.roots.len();
        self.roots.retain(|root| *root != id);
        if self.roots.len() == before {
            return false;
        }
        self.release(id);
        true
    }

    /// Unlinks `id` from its parent (or the root list) and releases its subtree.
    pub fn remove_subtree(&mut self, id: NodeId) {
        if self.get(id).is_none() {
            return;
        }
        self.unlink(id);
        self.roots.retain(|root| *root != id);
        self.release(id);
    }

    /// Removes every descendant of `root` whose role matches. Returns how many subtrees went.
    pub fn remove_where(&mut self, root: NodeId, role: Role) -> usize {
        let targets: Vec<NodeId> = self
            .descendants(root)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|node| node.role == role))
            .collect();
        let mut removed = 0;
        for id in targets {
            // A match nested inside an earlier match is already gone.
            if self.get(id).is_some() {
                self.remove_subtree(id);
                removed += 1;
            }
        }
        removed
    }

    /// Whether `id` is reachable from a root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let top = self.ancestors(id).last().copied().unwrap_or(id);
        self.roots.contains(&top)
    }

    /// Number of nodes reachable from the roots.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|root| self.subtree(*root).len()).sum()
    }

    /// `id` followed by all of its descendants in pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut nodes = self.subtree(id);
        if !nodes.is_empty() {
            nodes.remove(0);
        }
        nodes
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.get(id).and_then(Node::parent);
        while let Some(parent) = current {
            out.push(parent);
            current = self.get(parent).and_then(Node::parent);
        }
        out
    }

    pub fn resolved_font_size(&self, id: NodeId) -> f64 {
        self.inherited(id, |style| style.font_size)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    pub fn resolved_font(&self, id: NodeId) -> FontDescriptor {
        self.inherited(id, |style| style.font.clone())
            .unwrap_or_default()
    }

    pub fn resolved_color(&self, id: NodeId) -> Color {
        self.inherited(id, |style| style.color).unwrap_or(GRAY_900)
    }

    /// Deep-copies the subtree at `id` into fresh, unattached nodes of this tree.
    ///
    /// The copy's root carries the inherited typography of the source so it
    /// renders the same once moved under a different parent.
    pub fn deep_clone(&mut self, id: NodeId) -> Option<NodeId> {
        self.get(id)?;
        let font_size = self.resolved_font_size(id);
        let font = self.resolved_font(id);
        let color = self.resolved_color(id);

        let source = self.clone();
        let copy = self.copy_from(&source, id)?;
        if let Some(node) = self.get_mut(copy) {
            node.style.font_size = Some(font_size);
            node.style.font = Some(font);
            node.style.color = Some(color);
        }
        Some(copy)
    }

    /// Copies the subtree at `id` into a new standalone tree whose only root is the copy.
    pub fn extract(&self, id: NodeId) -> Option<Fragment> {
        self.get(id)?;
        let mut tree = RenderTree::new();
        let root = tree.copy_from(self, id)?;
        if let Some(node) = tree.get_mut(root) {
            node.style.font_size = Some(self.resolved_font_size(id));
            node.style.font = Some(self.resolved_font(id));
            node.style.color = Some(self.resolved_color(id));
        }
        tree.attach_root(root);
        Some(Fragment { tree, root })
    }

    fn copy_from(&mut self, source: &RenderTree, id: NodeId) -> Option<NodeId> {
        let node = source.get(id)?;
        let copy = self.insert(node.clone());
        for child in node.children() {
            if let Some(child_copy) = self.copy_from(source, *child) {
                self.append_child(copy, child_copy);
            }
        }
        Some(copy)
    }

    fn inherited<T>(&self, id: NodeId, pick: impl Fn(&Style) -> Option<T>) -> Option<T> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id)?;
            if let Some(value) = pick(&node.style) {
                return Some(value);
            }
            current = node.parent;
        }
        None
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).and_then(Node::parent) else {
            return;
        };
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    fn release(&mut self, id: NodeId) {
        for node_id in self.subtree(id) {
            self.slots[node_id.0] = None;
            self.free.push(node_id.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (RenderTree, NodeId, NodeId) {
        let mut tree = RenderTree::new();
        let root = tree.insert(Node::new(Role::Container, Style::block().font_size(14.0)));
        tree.attach_root(root);
        let list = tree.add_child(root, Node::new(Role::Container, Style::row(true)));
        tree.add_child(list, Node::with_text(Role::Chip, "the", Style::block()));
        tree.add_child(list, Node::with_text(Role::Chip, "fox", Style::block()));
        tree.add_child(root, Node::with_text(Role::Control, "Export", Style::block()));
        (tree, root, list)
    }

    #[test]
    fn node_count_tracks_attached_nodes() {
        let (mut tree, _root, list) = sample();
        assert_eq!(tree.node_count(), 5);

        let orphan = tree.insert(Node::new(Role::Container, Style::block()));
        assert_eq!(tree.node_count(), 5);
        assert!(!tree.is_attached(orphan));
        assert!(tree.is_attached(list));
    }

    #[test]
    fn deep_clone_leaves_original_untouched() {
        let (mut tree, _root, list) = sample();
        let copy = tree.deep_clone(list).unwrap();

        assert_ne!(copy, list);
        assert!(!tree.is_attached(copy));
        assert_eq!(tree.subtree(copy).len(), 3);

        if let Some(node) = tree.get_mut(copy) {
            node.style.gap = 12.0;
        }
        assert_eq!(tree.get(list).unwrap().style.gap, 0.0);
        // Inherited size is materialized on the copy.
        assert_eq!(tree.get(copy).unwrap().style.font_size, Some(14.0));
        assert_eq!(tree.get(list).unwrap().style.font_size, None);
    }

    #[test]
    fn detach_root_releases_subtree() {
        let (mut tree, _root, list) = sample();
        let copy = tree.deep_clone(list).unwrap();
        let container = tree.insert(Node::new(Role::Container, Style::block().offscreen()));
        tree.append_child(container, copy);
        tree.attach_root(container);
        assert_eq!(tree.node_count(), 9);
        assert_eq!(tree.visible_roots().len(), 1);

        assert!(tree.detach_root(container));
        assert_eq!(tree.node_count(), 5);
        assert!(tree.get(copy).is_none());
        assert!(!tree.detach_root(container));
    }

    #[test]
    fn remove_where_strips_matching_roles() {
        let (mut tree, root, _list) = sample();
        assert_eq!(tree.remove_where(root, Role::Control), 1);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.remove_where(root, Role::Control), 0);
    }

    #[test]
    fn extract_produces_standalone_copy() {
        let (tree, _root, list) = sample();
        let fragment = tree.extract(list).unwrap();
        assert_eq!(fragment.tree.node_count(), 3);
        assert_eq!(fragment.tree.resolved_font_size(fragment.root), 14.0);
    }

    #[test]
    fn append_child_rejects_cycles() {
        let (mut tree, root, list) = sample();
        tree.append_child(list, root);
        assert_eq!(tree.get(root).unwrap().parent(), None);
    }
}
