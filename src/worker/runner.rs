//! Worker execution loop.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::lifecycle::shutdown::ShutdownListener;
use crate::observability::metrics;
use crate::worker::unit::UnitOfWork;

pub use crate::config::schema::WaitMode;

/// Worker identity, unique within a supervisor. Ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub u32);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Worker lifecycle: `Running → ShuttingDown → Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    ShuttingDown,
    Stopped,
}

/// What a worker reports to the supervisor when it terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: WorkerId,
    /// Number of times the unit of work was invoked.
    pub invocations: u64,
    /// Number of those invocations that returned an error.
    pub failures: u64,
    /// Final state; always `Stopped` for a report returned by [`Worker::run`].
    pub state: WorkerState,
}

/// A loop that runs a unit of work on a fixed poll interval until shutdown.
pub struct Worker {
    id: WorkerId,
    shutdown: ShutdownListener,
    poll_interval: Duration,
    wait_mode: WaitMode,
    unit: Arc<dyn UnitOfWork>,
    state: WorkerState,
    invocations: u64,
    failures: u64,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        shutdown: ShutdownListener,
        poll_interval: Duration,
        wait_mode: WaitMode,
        unit: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            id,
            shutdown,
            poll_interval,
            wait_mode,
            unit,
            state: WorkerState::Running,
            invocations: 0,
            failures: 0,
        }
    }

    /// Run until shutdown is observed.
    ///
    /// Never fails: errors from the unit of work are logged and counted, and
    /// cancellation is a normal exit.
    pub async fn run(mut self) -> WorkerReport {
        tracing::info!(worker_id = %self.id, poll_interval_ms = self.poll_interval.as_millis() as u64, "Worker started");
        let _active = metrics::ActiveWorkerGuard::enter();

        loop {
            if self.shutdown.is_triggered() {
                self.state = WorkerState::ShuttingDown;
                tracing::info!(worker_id = %self.id, "Worker is shutting down");
                break;
            }

            tracing::debug!(worker_id = %self.id, "Worker is running");
            self.invocations += 1;
            let success = match self.unit.run_once().await {
                Ok(()) => true,
                Err(e) => {
                    self.failures += 1;
                    tracing::warn!(worker_id = %self.id, error = %e, "Unit of work failed");
                    false
                }
            };
            metrics::record_invocation(self.id.0, success);

            self.wait().await;
        }

        self.state = WorkerState::Stopped;
        tracing::info!(
            worker_id = %self.id,
            invocations = self.invocations,
            failures = self.failures,
            "Worker stopped"
        );

        WorkerReport {
            id: self.id,
            invocations: self.invocations,
            failures: self.failures,
            state: self.state,
        }
    }

    async fn wait(&mut self) {
        match self.wait_mode {
            WaitMode::Fixed => sleep(self.poll_interval).await,
            WaitMode::Interruptible => {
                tokio::select! {
                    _ = sleep(self.poll_interval) => {}
                    _ = self.shutdown.triggered() => {
                        tracing::debug!(worker_id = %self.id, "Poll wait interrupted by shutdown");
                    }
                }
            }
        }
    }
}
