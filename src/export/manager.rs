use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
    task::{Context, Poll},
    time::Duration,
};

use tokio::sync::{mpsc, oneshot};

use crate::export::{
    capture::SnapshotCapturer,
    dependencies::ExportDependencies,
    file::FileSaveConfig,
    pipeline::{ExportRequest, StateCell, perform_export, set_state},
    types::{Artifact, CallSite, ExportAction, ExportConfig, ExportError, ExportState},
};
use crate::scene::ElementRef;

/// Default bound on a single rasterization.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Manager-wide settings that do not vary per trigger.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// `None` lets a stalled backend keep the manager busy indefinitely.
    pub capture_timeout: Option<Duration>,
    pub save_config: FileSaveConfig,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            capture_timeout: Some(DEFAULT_CAPTURE_TIMEOUT),
            save_config: FileSaveConfig::default(),
        }
    }
}

struct ExportJob {
    request: ExportRequest,
    reply: oneshot::Sender<Result<Artifact, ExportError>>,
}

/// Drives exports for one view.
///
/// Requests are handed to a background task on the runtime; the state
/// machine doubles as the busy guard, so a trigger that arrives while a run
/// is in flight is dropped before it reaches the capturer.
#[derive(Clone)]
pub struct ExportManager {
    /// Channel for sending export jobs.
    request_tx: mpsc::UnboundedSender<ExportJob>,
    /// Shared state of the current (or last) run.
    state: StateCell,
    save_config: FileSaveConfig,
}

impl ExportManager {
    /// Create a new export manager backed by Cairo, the filesystem and the
    /// Wayland clipboard.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning async tasks
    pub fn new(runtime_handle: &tokio::runtime::Handle, settings: ExportSettings) -> Self {
        Self::with_dependencies(runtime_handle, ExportDependencies::default(), settings)
    }

    /// Create an export manager with custom dependencies (useful for testing).
    pub fn with_dependencies(
        runtime_handle: &tokio::runtime::Handle,
        dependencies: ExportDependencies,
        settings: ExportSettings,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ExportJob>();
        let state: StateCell = Arc::new(Mutex::new(ExportState::Idle));
        let dependencies = Arc::new(dependencies);
        let capturer =
            SnapshotCapturer::new(Arc::clone(&dependencies.backend), settings.capture_timeout);

        let state_clone = Arc::clone(&state);

        // Spawn background task to handle export jobs
        runtime_handle.spawn(async move {
            while let Some(job) = request_rx.recv().await {
                let run = tokio::spawn(run_job(
                    job,
                    capturer.clone(),
                    Arc::clone(&dependencies),
                    Arc::clone(&state_clone),
                ));
                if let Err(e) = run.await {
                    log::error!("Export task aborted: {}", e);
                }
            }
        });

        Self {
            request_tx,
            state,
            save_config: settings.save_config,
        }
    }

    /// Request an export of `element`.
    ///
    /// Returns `None` without doing anything when a run is already in
    /// flight. Otherwise the run starts in the background and the returned
    /// ticket resolves to its outcome.
    pub fn request_export(
        &self,
        element: ElementRef,
        site: CallSite,
        config: ExportConfig,
        action: ExportAction,
    ) -> Option<ExportTicket> {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.is_busy() {
                log::debug!("Export already in progress ({:?}); ignoring trigger", *state);
                return None;
            }
            *state = ExportState::Capturing;
        }

        let (reply, receiver) = oneshot::channel();
        let job = ExportJob {
            request: ExportRequest {
                element,
                site,
                config,
                action,
                save_config: self.save_config.clone(),
            },
            reply,
        };

        if self.request_tx.send(job).is_err() {
            log::error!("Export manager not running");
            set_state(
                &self.state,
                ExportState::Failed("Export manager not running".to_string()),
            );
        }

        Some(ExportTicket { receiver })
    }

    /// Current pipeline state.
    pub fn state(&self) -> ExportState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state().is_busy()
    }
}

async fn run_job(
    job: ExportJob,
    capturer: SnapshotCapturer,
    dependencies: Arc<ExportDependencies>,
    state: StateCell,
) {
    let _reset = BusyReset(Arc::clone(&state));

    let outcome = perform_export(job.request, &capturer, dependencies, &state).await;
    match &outcome {
        Ok(artifact) => {
            log::info!(
                "Export finished: {:?} ({} bytes) -> {:?}",
                artifact.kind,
                artifact.payload.len(),
                artifact.destination
            );
            set_state(&state, ExportState::Done);
        }
        Err(e) => {
            log::error!("Export failed: {}", e);
            set_state(&state, ExportState::Failed(e.to_string()));
        }
    }

    if job.reply.send(outcome).is_err() {
        log::debug!("Export ticket dropped before completion");
    }
}

/// Leaves the busy states if a run unwinds before reaching a terminal state.
struct BusyReset(StateCell);

impl Drop for BusyReset {
    fn drop(&mut self) {
        let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_busy() {
            *state = ExportState::Failed("Export task aborted".to_string());
        }
    }
}

/// Resolves to the outcome of one export run.
#[derive(Debug)]
pub struct ExportTicket {
    receiver: oneshot::Receiver<Result<Artifact, ExportError>>,
}

impl Future for ExportTicket {
    type Output = Result<Artifact, ExportError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(ExportError::CaptureFailure("Export task aborted".to_string()))
            })
        })
    }
}

#[cfg(test)]
impl ExportManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<ExportJob>();
        drop(rx);
        Self {
            request_tx: tx,
            state: Arc::new(Mutex::new(ExportState::Idle)),
            save_config: FileSaveConfig::default(),
        }
    }
}
