use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use crate::export::{
    capture::SnapshotCapturer,
    compose::compose_label,
    dependencies::{ExportClipboard, ExportDependencies, ExportFileSaver},
    encode::{encode_pdf, encode_png},
    file::FileSaveConfig,
    policy::StylePolicy,
    types::{
        Artifact, ArtifactDestination, ArtifactKind, CallSite, ExportAction, ExportConfig,
        ExportError, ExportState, SUPERSAMPLE_SCALE,
    },
};
use crate::scene::ElementRef;
use tokio::task;

pub(crate) type StateCell = Arc<Mutex<ExportState>>;

pub(crate) fn set_state(state: &StateCell, next: ExportState) {
    let mut current = state.lock().unwrap_or_else(PoisonError::into_inner);
    log::debug!("Export state {:?} -> {:?}", *current, next);
    *current = next;
}

#[derive(Clone)]
pub(crate) struct ExportRequest {
    pub(crate) element: ElementRef,
    pub(crate) site: CallSite,
    pub(crate) config: ExportConfig,
    pub(crate) action: ExportAction,
    pub(crate) save_config: FileSaveConfig,
}

impl fmt::Debug for ExportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportRequest")
            .field("element", &self.element)
            .field("site", &self.site)
            .field("action", &self.action)
            .field("font_size_px", &self.config.font_size_px())
            .field("layout_mode", &self.config.layout_mode())
            .field("include_label", &self.config.include_label())
            .finish()
    }
}

/// Runs capture, composition and encoding in order, recording each stage in `state`.
///
/// Terminal states (`Done`/`Failed`) are left to the caller.
pub(crate) async fn perform_export(
    request: ExportRequest,
    capturer: &SnapshotCapturer,
    dependencies: Arc<ExportDependencies>,
    state: &StateCell,
) -> Result<Artifact, ExportError> {
    log::debug!("Starting export: {:?}", request);
    let policy = StylePolicy::for_call_site(request.site);

    // Step 1: Capture the element through an off-screen clone
    set_state(state, ExportState::Capturing);
    let bitmap = capturer
        .capture(&request.element, &policy, &request.config)
        .await?;
    log::debug!("Captured {}x{} bitmap", bitmap.width, bitmap.height);

    // Step 2: Stack the label above the content (if requested)
    set_state(state, ExportState::Composing);
    let min_width = policy.min_label_width(&request.config);
    let config = request.config.clone();
    let bitmap = task::spawn_blocking(move || compose_label(bitmap, &config, min_width))
        .await
        .map_err(|e| ExportError::EncodingFailure(format!("Compose task failed: {}", e)))??;

    // Step 3: Encode and deliver
    set_state(state, ExportState::Encoding);
    match request.action {
        ExportAction::Clipboard => {
            let payload = task::spawn_blocking(move || encode_png(&bitmap))
                .await
                .map_err(|e| ExportError::EncodingFailure(format!("PNG task failed: {}", e)))??;
            copy_to_clipboard(Arc::clone(&dependencies.clipboard), payload.clone()).await?;
            Ok(Artifact {
                kind: ArtifactKind::Png,
                payload,
                destination: ArtifactDestination::Clipboard,
                page: None,
            })
        }
        ExportAction::Document => {
            let (payload, page) =
                task::spawn_blocking(move || encode_pdf(&bitmap, SUPERSAMPLE_SCALE))
                    .await
                    .map_err(|e| ExportError::EncodingFailure(format!("PDF task failed: {}", e)))??;
            let path = save_document(
                Arc::clone(&dependencies.saver),
                payload.clone(),
                request.save_config,
            )
            .await?;
            Ok(Artifact {
                kind: ArtifactKind::Pdf,
                payload,
                destination: ArtifactDestination::File(path),
                page: Some(page),
            })
        }
    }
}

async fn save_document(
    saver: Arc<dyn ExportFileSaver>,
    payload: Vec<u8>,
    config: FileSaveConfig,
) -> Result<std::path::PathBuf, ExportError> {
    task::spawn_blocking(move || saver.save(&payload, &config))
        .await
        .map_err(|e| ExportError::EncodingFailure(format!("Save task failed: {}", e)))?
}

async fn copy_to_clipboard(
    clipboard: Arc<dyn ExportClipboard>,
    payload: Vec<u8>,
) -> Result<(), ExportError> {
    task::spawn_blocking(move || clipboard.copy(&payload))
        .await
        .map_err(|e| ExportError::ClipboardFailure(format!("Clipboard task failed: {}", e)))?
}
