//! Background worker for pipeline runs.
//!
//! A run executes on its own tokio task so the interactive side stays
//! responsive. Progress reaches the caller through an unbounded channel of
//! [`PipelineEvent`]s, which closes once the job and every sink clone are
//! dropped. Only one run may be in flight per [`Worker`].

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use thiserror::Error;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    task::JoinHandle,
};

use crate::events::{EventSink, PipelineEvent};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("a run is already in progress")]
    AlreadyRunning,
    #[error("worker task failed: {0}")]
    Join(String),
}

#[derive(Debug, Clone, Default)]
pub struct Worker {
    busy: Arc<AtomicBool>,
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a run started by [`Worker::spawn`].
///
/// Drain [`next_event`](Self::next_event) until it returns `None`, then call
/// [`join`](Self::join) for the result.
pub struct RunHandle<T> {
    events: UnboundedReceiver<PipelineEvent>,
    task: JoinHandle<T>,
}

impl<T> RunHandle<T> {
    /// Next progress event, or `None` once the run has finished emitting.
    pub async fn next_event(&mut self) -> Option<PipelineEvent> {
        self.events.recv().await
    }

    /// Waits for the run to finish and returns its result.
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::Join` when the run panicked or was aborted.
    pub async fn join(self) -> Result<T, WorkerError> {
        self.task
            .await
            .map_err(|e| WorkerError::Join(e.to_string()))
    }
}

impl Worker {
    /// Creates an idle worker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Starts `job` on a background task, handing it the sink to report
    /// progress through.
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::AlreadyRunning` while a previous run is still in
    /// flight.
    pub fn spawn<F, Fut, T>(&self, job: F) -> Result<RunHandle<T>, WorkerError>
    where
        F: FnOnce(Arc<dyn EventSink>) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(WorkerError::AlreadyRunning);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let (tx, rx) = mpsc::unbounded_channel();
        let future = job(Arc::new(tx));
        let task = tokio::spawn(async move {
            let _guard = guard;
            future.await
        });

        Ok(RunHandle { events: rx, task })
    }
}
