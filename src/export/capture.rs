//! Snapshot capture of live elements through an off-screen clone.

use std::{sync::Arc, time::Duration};

use super::{
    dependencies::RasterBackend,
    policy::StylePolicy,
    types::{CapturedBitmap, ExportConfig, ExportError, SUPERSAMPLE_SCALE},
};
use crate::scene::{self, ElementRef, Fragment, Node, NodeId, Role, SharedRenderTree, Style};

/// Clones elements into off-screen containers and rasterizes them.
#[derive(Clone)]
pub struct SnapshotCapturer {
    backend: Arc<dyn RasterBackend>,
    timeout: Option<Duration>,
}

impl SnapshotCapturer {
    /// `timeout` bounds the rasterization step; `None` waits indefinitely.
    pub fn new(backend: Arc<dyn RasterBackend>, timeout: Option<Duration>) -> Self {
        Self { backend, timeout }
    }

    /// Captures `element` at the supersampling scale.
    ///
    /// The live element is never modified. The off-screen container holding
    /// the rewritten clone is detached before this returns, whatever the
    /// outcome, and also if the returned future is dropped early.
    pub async fn capture(
        &self,
        element: &ElementRef,
        policy: &StylePolicy,
        config: &ExportConfig,
    ) -> Result<CapturedBitmap, ExportError> {
        let (container, fragment) = OffscreenContainer::mount(element, policy, config)?;

        let raster = self.backend.rasterize(fragment, SUPERSAMPLE_SCALE);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, raster).await {
                Ok(result) => result,
                Err(_) => Err(ExportError::CaptureFailure(format!(
                    "Rasterization timed out after {}ms",
                    limit.as_millis()
                ))),
            },
            None => raster.await,
        };

        drop(container);
        result
    }
}

/// Off-screen root hosting a clone for the duration of one capture.
/// Dropping it detaches and releases the container.
struct OffscreenContainer {
    tree: SharedRenderTree,
    id: NodeId,
}

impl OffscreenContainer {
    /// Clones the element under a new off-screen root, applies the policy
    /// and extracts the result for rasterization.
    fn mount(
        element: &ElementRef,
        policy: &StylePolicy,
        config: &ExportConfig,
    ) -> Result<(Self, Fragment), ExportError> {
        let (id, clone) = {
            let mut tree = scene::lock(&element.tree);
            if !tree.is_attached(element.id) {
                return Err(ExportError::CaptureFailure(format!(
                    "Element {:?} is not attached",
                    element.id
                )));
            }
            let clone = tree.deep_clone(element.id).ok_or_else(|| {
                ExportError::CaptureFailure(format!("Element {:?} vanished", element.id))
            })?;
            let id = tree.insert(Node::new(Role::Container, Style::block().offscreen()));
            tree.append_child(id, clone);
            tree.attach_root(id);
            (id, clone)
        };
        let container = Self {
            tree: Arc::clone(&element.tree),
            id,
        };

        let fragment = {
            let mut tree = scene::lock(&element.tree);
            policy.apply(&mut tree, clone, config);
            tree.extract(id).ok_or_else(|| {
                ExportError::CaptureFailure("Off-screen container vanished".to_string())
            })?
        };

        log::debug!(
            "Mounted off-screen clone of {:?} ({} nodes)",
            element.id,
            fragment.tree.node_count()
        );
        Ok((container, fragment))
    }
}

impl Drop for OffscreenContainer {
    fn drop(&mut self) {
        let mut tree = scene::lock(&self.tree);
        if tree.detach_root(self.id) {
            log::debug!("Detached off-screen container {:?}", self.id);
        }
    }
}
