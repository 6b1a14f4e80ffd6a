//! Worker supervision.
//!
//! # Responsibilities
//! - Spawn a fixed batch of workers with ids `1..=n`
//! - Own the shutdown signal (sole writer)
//! - Join every worker and report how each one ended
//!
//! # Design Decisions
//! - `start` is accepted once; later calls are rejected without side effects
//! - A panicking worker is reported as `Aborted`, distinct from a clean stop
//! - `wait_all` has no timeout; the poll interval bounds worker exit latency

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::schema::WorkerConfig;
use crate::lifecycle::shutdown::Shutdown;
use crate::worker::{UnitOfWork, WaitMode, Worker, WorkerId, WorkerReport};

/// Errors returned by [`Supervisor::start`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupervisorError {
    #[error("supervisor already started {0} workers")]
    AlreadyStarted(usize),

    #[error("cannot start workers after shutdown was requested")]
    ShutdownRequested,

    #[error("worker count must be at least 1")]
    NoWorkers,
}

/// How a single worker ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// The worker observed shutdown and left its loop.
    Stopped(WorkerReport),
    /// The worker task ended abnormally (panic or runtime cancellation).
    Aborted { id: WorkerId, reason: String },
}

impl WorkerOutcome {
    pub fn id(&self) -> WorkerId {
        match self {
            WorkerOutcome::Stopped(report) => report.id,
            WorkerOutcome::Aborted { id, .. } => *id,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, WorkerOutcome::Stopped(_))
    }
}

/// Result of [`Supervisor::wait_all`], ordered by worker id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupervisorReport {
    pub outcomes: Vec<WorkerOutcome>,
}

impl SupervisorReport {
    pub fn stopped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_stopped()).count()
    }

    pub fn aborted(&self) -> usize {
        self.outcomes.len() - self.stopped()
    }

    /// Total unit-of-work invocations across cleanly stopped workers.
    pub fn invocations(&self) -> u64 {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                WorkerOutcome::Stopped(report) => Some(report.invocations),
                WorkerOutcome::Aborted { .. } => None,
            })
            .sum()
    }
}

/// Owns the workers and the shutdown signal they observe.
pub struct Supervisor {
    shutdown: Shutdown,
    poll_interval: Duration,
    wait_mode: WaitMode,
    started: usize,
    handles: Vec<(WorkerId, JoinHandle<WorkerReport>)>,
}

impl Supervisor {
    pub fn new(poll_interval: Duration, wait_mode: WaitMode) -> Self {
        Self {
            shutdown: Shutdown::new(),
            poll_interval,
            wait_mode,
            started: 0,
            handles: Vec::new(),
        }
    }

    /// Supervisor using the poll interval and wait mode of `config`.
    pub fn from_config(config: &WorkerConfig) -> Self {
        Self::new(config.poll_interval(), config.wait_mode)
    }

    /// Spawn `count` workers sharing `unit`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self, count: usize, unit: Arc<dyn UnitOfWork>) -> Result<(), SupervisorError> {
        if self.started > 0 {
            return Err(SupervisorError::AlreadyStarted(self.started));
        }
        if self.shutdown.is_triggered() {
            return Err(SupervisorError::ShutdownRequested);
        }
        if count == 0 {
            return Err(SupervisorError::NoWorkers);
        }

        for n in 1..=count {
            let id = WorkerId(n as u32);
            let worker = Worker::new(
                id,
                self.shutdown.subscribe(),
                self.poll_interval,
                self.wait_mode,
                unit.clone(),
            );
            self.handles.push((id, tokio::spawn(worker.run())));
        }
        self.started = count;

        tracing::info!(
            workers = count,
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            wait_mode = ?self.wait_mode,
            "Workers started"
        );
        Ok(())
    }

    /// Request shutdown. Does not wait.
    ///
    /// Returns `true` for the call that actually requested it; repeated calls
    /// are no-ops.
    pub fn shutdown(&self) -> bool {
        let first = self.shutdown.trigger();
        if first {
            tracing::info!(workers = self.started, "Shutdown requested");
        }
        first
    }

    /// Handle to the shutdown signal, for the OS signal watcher.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Number of workers started by this supervisor.
    pub fn started(&self) -> usize {
        self.started
    }

    /// Block until every started worker has terminated.
    ///
    /// Without a prior shutdown request this waits indefinitely. Calling it
    /// again after it returned yields an empty report. Dropping the future
    /// early keeps the handles of workers that have not been joined yet.
    pub async fn wait_all(&mut self) -> SupervisorReport {
        let mut outcomes = Vec::with_capacity(self.handles.len());

        while let Some((id, handle)) = self.handles.first_mut() {
            let id = *id;
            let result = handle.await;
            self.handles.remove(0);

            let outcome = match result {
                Ok(report) => WorkerOutcome::Stopped(report),
                Err(e) => {
                    let reason = if e.is_panic() {
                        "worker panicked".to_string()
                    } else {
                        e.to_string()
                    };
                    tracing::error!(worker_id = %id, reason = %reason, "Worker terminated abnormally");
                    WorkerOutcome::Aborted { id, reason }
                }
            };
            outcomes.push(outcome);
        }

        SupervisorReport { outcomes }
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("started", &self.started)
            .field("pending", &self.handles.len())
            .field("poll_interval", &self.poll_interval)
            .field("shutdown", &self.shutdown)
            .finish()
    }
}
