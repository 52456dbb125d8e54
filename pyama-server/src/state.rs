//! Shared application state.
//!
//! The active viewer session is process-wide state scoped to one open
//! (dataset file, output directory) pair; opening a new pair replaces it
//! wholesale. All session access is serialized through a mutex, matching
//! the single-logical-client model of the viewer contract.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pyama_core::ViewerSession;
use pyama_io::{MetadataReader, NoMetadata};
use pyama_pipeline::{CommandRunner, Dispatcher, JobEvent, JobSpec, StageError, StageRunner};

use crate::metadata::CommandMetadataReader;
use crate::render::RasterRenderer;

/// A viewer session together with the paths it persists to.
pub struct OpenSession {
    pub session: ViewerSession,
    /// Track file enablement toggles are written back to, when the output
    /// tree has one.
    pub tracks_path: Option<PathBuf>,
}

/// Process-wide shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<Inner>,
}

pub struct Inner {
    /// The single active session, replaced on every `select_paths`.
    pub session: Mutex<Option<OpenSession>>,
    /// Background job dispatcher.
    pub dispatcher: Dispatcher,
    /// Artifact renderer for the viewer session.
    pub renderer: RasterRenderer,
    /// Probe for dataset-file extents, consulted at bootstrap.
    pub metadata: Box<dyn MetadataReader>,
}

impl AppState {
    /// Builds the state and the job event receiver the caller must drain.
    pub fn new(pipeline_cmd: Option<PathBuf>) -> (Self, Receiver<JobEvent>) {
        let (runner, metadata): (Arc<dyn StageRunner>, Box<dyn MetadataReader>) = match pipeline_cmd
        {
            Some(program) => (
                Arc::new(CommandRunner::new(program.clone())),
                Box::new(CommandMetadataReader::new(program)),
            ),
            None => (Arc::new(UnconfiguredRunner), Box::new(NoMetadata)),
        };
        let (dispatcher, events) = Dispatcher::new(runner);
        (
            Self {
                inner: Arc::new(Inner {
                    session: Mutex::new(None),
                    dispatcher,
                    renderer: RasterRenderer::default(),
                    metadata,
                }),
            },
            events,
        )
    }

    /// Locks the session slot, recovering from a poisoned lock.
    pub fn session(&self) -> MutexGuard<'_, Option<OpenSession>> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Placeholder runner used when no pipeline program is configured; refuses
/// every job at preflight so nothing is ever falsely acknowledged.
struct UnconfiguredRunner;

impl StageRunner for UnconfiguredRunner {
    fn preflight(&self, _job: &JobSpec) -> Result<(), StageError> {
        Err(StageError::Unavailable(
            "no pipeline backend configured (set --pipeline-cmd)".into(),
        ))
    }

    fn run(&self, _job: &JobSpec) -> Result<(), StageError> {
        Err(StageError::Unavailable(
            "no pipeline backend configured".into(),
        ))
    }
}
