use crate::error::{DispatchError, Result};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

pub type ForegroundJob = Box<dyn FnOnce() + Send + 'static>;

/// Where results are handed back to the caller. Jobs must run one at a time.
pub trait ForegroundContext: Send + Sync {
    fn dispatch(&self, job: ForegroundJob);
}

/// Sending half of a serial job queue.
#[derive(Debug, Clone)]
pub struct SerialDispatcher {
    jobs: UnboundedSender<ForegroundJob>,
}

impl SerialDispatcher {
    /// Creates the queue without starting a consumer; the caller drives the loop.
    #[must_use]
    pub fn channel() -> (Self, ForegroundLoop) {
        let (jobs, pending) = unbounded_channel();
        (Self { jobs }, ForegroundLoop { pending })
    }

    /// Creates the queue and drains it from a single task on `handle`.
    #[must_use]
    pub fn spawn_on(handle: &Handle) -> Self {
        let (dispatcher, foreground) = Self::channel();
        handle.spawn(foreground.run());
        dispatcher
    }
}

impl ForegroundContext for SerialDispatcher {
    fn dispatch(&self, job: ForegroundJob) {
        if self.jobs.send(job).is_err() {
            warn!("Foreground loop is gone, dropping job");
        }
    }
}

/// Receiving half of a [`SerialDispatcher`].
#[derive(Debug)]
pub struct ForegroundLoop {
    pending: UnboundedReceiver<ForegroundJob>,
}

impl ForegroundLoop {
    /// Runs jobs in arrival order until every dispatcher is dropped.
    pub async fn run(mut self) {
        while let Some(job) = self.pending.recv().await {
            run_job(job);
        }
        debug!("Foreground loop finished");
    }

    /// Runs whatever is queued right now and returns how many jobs ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.pending.try_recv() {
            run_job(job);
            ran += 1;
        }
        ran
    }
}

fn run_job(job: ForegroundJob) {
    if catch_unwind(AssertUnwindSafe(job)).is_err() {
        error!("Foreground job panicked");
    }
}

/// Background runtime plus the foreground queue results are delivered to.
#[derive(Clone)]
pub struct ExecutionContexts {
    pub background: Handle,
    pub foreground: Arc<dyn ForegroundContext>,
}

impl ExecutionContexts {
    #[must_use]
    pub fn new(background: Handle, foreground: Arc<dyn ForegroundContext>) -> Self {
        Self {
            background,
            foreground,
        }
    }

    /// Uses the ambient tokio runtime for both contexts.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::RuntimeError` when called outside a tokio runtime.
    pub fn current() -> Result<Self> {
        let background = Handle::try_current()
            .map_err(|e| DispatchError::RuntimeError(format!("No tokio runtime: {e}")))?;
        let foreground = SerialDispatcher::spawn_on(&background);
        Ok(Self::new(background, Arc::new(foreground)))
    }
}
