//! Background job dispatch.
//!
//! Validated jobs run on worker threads outside the request/response cycle.
//! The dispatcher returns an accept/reject acknowledgment immediately after
//! handoff; completion and failure are reported on an mpsc event channel
//! that the embedding service drains out-of-band. Dispatched jobs cannot be
//! cancelled through this interface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::StageError;
use crate::job::{JobSpec, JobStatus};

/// Monotonically increasing handle of a dispatched job.
pub type JobId = u64;

/// Events emitted on the dispatcher's channel when a job ends.
#[derive(Debug)]
pub enum JobEvent {
    /// The stage ran to completion.
    Finished {
        id: JobId,
        stage: &'static str,
        elapsed: Duration,
    },
    /// The stage started but failed while running.
    Failed {
        id: JobId,
        stage: &'static str,
        error: String,
    },
}

/// Executes canonical jobs on behalf of the dispatcher.
///
/// `preflight` is the synchronous refusal gate: it must be cheap and is
/// called before any thread is spawned. `run` performs the long work and is
/// called on a worker thread.
pub trait StageRunner: Send + Sync + 'static {
    /// Checks whether the backend can take the job at all.
    fn preflight(&self, _job: &JobSpec) -> Result<(), StageError> {
        Ok(())
    }

    /// Runs the stage to completion. Side effects land on the storage
    /// layer; nothing is reported back except success or failure.
    fn run(&self, job: &JobSpec) -> Result<(), StageError>;
}

/// Accepts canonical jobs and starts them as independent background work.
pub struct Dispatcher {
    runner: Arc<dyn StageRunner>,
    tx: Sender<JobEvent>,
    next_id: AtomicU64,
}

impl Dispatcher {
    /// Creates a dispatcher around a runner, returning the event receiver
    /// the embedding service should drain.
    pub fn new(runner: Arc<dyn StageRunner>) -> (Self, Receiver<JobEvent>) {
        let (tx, rx) = channel();
        (
            Self {
                runner,
                tx,
                next_id: AtomicU64::new(0),
            },
            rx,
        )
    }

    /// Dispatches a job for background execution.
    ///
    /// Returns `rejected` with the runner's refusal message if preflight
    /// fails; otherwise spawns the worker and returns `accepted` with the
    /// job id. `accepted` is only ever returned after the worker thread has
    /// actually been handed the job.
    pub fn dispatch(&self, job: JobSpec) -> JobStatus {
        if let Err(err) = self.runner.preflight(&job) {
            warn!(stage = job.stage_name(), %err, "job refused");
            return JobStatus::rejected(err.to_string());
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let stage = job.stage_name();
        let runner = Arc::clone(&self.runner);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let start = Instant::now();
            match runner.run(&job) {
                Ok(()) => {
                    let _ = tx.send(JobEvent::Finished {
                        id,
                        stage,
                        elapsed: start.elapsed(),
                    });
                }
                Err(err) => {
                    let _ = tx.send(JobEvent::Failed {
                        id,
                        stage,
                        error: err.to_string(),
                    });
                }
            }
        });

        info!(stage, id, "job dispatched");
        JobStatus::accepted(id, format!("{stage} started in background"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::job::JobState;

    /// Runner that records every job it is handed.
    #[derive(Default)]
    struct RecordingRunner {
        refuse: bool,
        fail: bool,
        jobs: Mutex<Vec<JobSpec>>,
    }

    impl StageRunner for RecordingRunner {
        fn preflight(&self, _job: &JobSpec) -> Result<(), StageError> {
            if self.refuse {
                return Err(StageError::Unavailable("not configured".into()));
            }
            Ok(())
        }

        fn run(&self, job: &JobSpec) -> Result<(), StageError> {
            self.jobs.lock().unwrap().push(job.clone());
            if self.fail {
                return Err(StageError::Failed("boom".into()));
            }
            Ok(())
        }
    }

    fn tracking_job() -> JobSpec {
        JobSpec::Tracking {
            positions: vec![0, 1, 2],
            expand_labels: false,
        }
    }

    #[test]
    fn test_accepted_job_runs_and_emits_finished() {
        let runner = Arc::new(RecordingRunner::default());
        let (dispatcher, rx) = Dispatcher::new(Arc::clone(&runner) as Arc<dyn StageRunner>);

        let status = dispatcher.dispatch(tracking_job());
        assert_eq!(status.state, JobState::Accepted);
        assert_eq!(status.job_id, Some(1));

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(event, JobEvent::Finished { id: 1, .. }));
        assert_eq!(runner.jobs.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_refused_job_is_rejected_and_never_run() {
        let runner = Arc::new(RecordingRunner {
            refuse: true,
            ..RecordingRunner::default()
        });
        let (dispatcher, rx) = Dispatcher::new(Arc::clone(&runner) as Arc<dyn StageRunner>);

        let status = dispatcher.dispatch(tracking_job());
        assert_eq!(status.state, JobState::Rejected);
        assert!(status.message.contains("not configured"));
        assert_eq!(status.job_id, None);

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert!(runner.jobs.lock().unwrap().is_empty());
    }

    #[test]
    fn test_runtime_failure_surfaces_only_on_event_channel() {
        let runner = Arc::new(RecordingRunner {
            fail: true,
            ..RecordingRunner::default()
        });
        let (dispatcher, rx) = Dispatcher::new(runner as Arc<dyn StageRunner>);

        // The acknowledgment is still accepted: handoff succeeded.
        let status = dispatcher.dispatch(tracking_job());
        assert_eq!(status.state, JobState::Accepted);

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match event {
            JobEvent::Failed { error, .. } => assert!(error.contains("boom")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_job_ids_are_monotonic() {
        let runner = Arc::new(RecordingRunner::default());
        let (dispatcher, _rx) = Dispatcher::new(runner as Arc<dyn StageRunner>);

        let a = dispatcher.dispatch(tracking_job());
        let b = dispatcher.dispatch(tracking_job());
        assert!(b.job_id.unwrap() > a.job_id.unwrap());
    }
}
