//! Render tree standing in for the on-screen visualization.
//!
//! Views build styled node trees here; the export pipeline clones subtrees
//! into off-screen containers, rewrites their styles and rasterizes them
//! through [`paint::rasterize`].

pub mod layout;
pub mod paint;
pub mod style;
pub mod tree;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use layout::{LayoutBox, Rect, TextMeasure};
pub use style::{Display, Style};
pub use tree::{Fragment, Node, NodeId, RenderTree, Role};

/// Render tree shared between views and in-flight exports.
pub type SharedRenderTree = Arc<Mutex<RenderTree>>;

pub fn shared(tree: RenderTree) -> SharedRenderTree {
    Arc::new(Mutex::new(tree))
}

/// Locks the tree, recovering it if a previous holder panicked.
pub fn lock(tree: &SharedRenderTree) -> MutexGuard<'_, RenderTree> {
    tree.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a live element of a shared render tree.
#[derive(Clone)]
pub struct ElementRef {
    pub tree: SharedRenderTree,
    pub id: NodeId,
}

impl ElementRef {
    pub fn new(tree: SharedRenderTree, id: NodeId) -> Self {
        Self { tree, id }
    }
}

impl std::fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRef").field("id", &self.id).finish()
    }
}
