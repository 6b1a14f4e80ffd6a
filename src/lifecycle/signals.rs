//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGINT, SIGTERM, SIGABRT)
//! - Translate the first signal into a shutdown request
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Handlers are registered before the watcher task starts, so a
//!   registration failure surfaces as a startup error
//! - Signals after the first are logged and ignored

use std::io;
use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// Listens for termination signals and triggers shutdown once.
pub struct SignalWatcher {
    shutdown: Shutdown,
    #[cfg(unix)]
    streams: unix::Streams,
}

impl SignalWatcher {
    /// Register the signal handlers.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn install(shutdown: Shutdown) -> io::Result<Self> {
        Ok(Self {
            shutdown,
            #[cfg(unix)]
            streams: unix::Streams::register()?,
        })
    }

    /// Run the watcher as a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Watch for signals until the task is aborted.
    pub async fn run(mut self) {
        loop {
            let name = self.next_signal().await;
            if self.shutdown.trigger() {
                tracing::warn!(signal = name, "Received termination signal, shutting down gracefully");
            } else {
                tracing::debug!(signal = name, "Shutdown already in progress, ignoring signal");
            }
        }
    }

    #[cfg(unix)]
    async fn next_signal(&mut self) -> &'static str {
        self.streams.recv().await
    }

    #[cfg(not(unix))]
    async fn next_signal(&mut self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        "ctrl-c"
    }
}

#[cfg(unix)]
mod unix {
    use nix::sys::signal::Signal;
    use std::io;
    use tokio::signal::unix::{signal, Signal as SignalStream, SignalKind};

    pub(super) struct Streams {
        interrupt: SignalStream,
        terminate: SignalStream,
        abort: SignalStream,
    }

    impl Streams {
        pub(super) fn register() -> io::Result<Self> {
            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
                abort: signal(SignalKind::from_raw(Signal::SIGABRT as i32))?,
            })
        }

        pub(super) async fn recv(&mut self) -> &'static str {
            tokio::select! {
                _ = self.interrupt.recv() => "SIGINT",
                _ = self.terminate.recv() => "SIGTERM",
                _ = self.abort.recv() => "SIGABRT",
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use nix::sys::signal::{raise, Signal};
    use std::time::Duration;

    async fn wait_triggered(shutdown: &Shutdown) {
        let mut listener = shutdown.subscribe();
        tokio::time::timeout(Duration::from_secs(2), listener.triggered())
            .await
            .expect("signal should trigger shutdown");
    }

    #[tokio::test]
    async fn test_signal_triggers_shutdown_once() {
        let shutdown = Shutdown::new();
        let handle = SignalWatcher::install(shutdown.clone()).unwrap().spawn();

        raise(Signal::SIGTERM).unwrap();
        wait_triggered(&shutdown).await;
        assert!(shutdown.is_triggered());

        // A second signal is absorbed by the watcher.
        raise(Signal::SIGINT).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(shutdown.is_triggered());
        assert!(!handle.is_finished());

        handle.abort();
    }

    #[tokio::test]
    async fn test_sigabrt_triggers_shutdown() {
        let shutdown = Shutdown::new();
        let handle = SignalWatcher::install(shutdown.clone()).unwrap().spawn();

        raise(Signal::SIGABRT).unwrap();
        wait_triggered(&shutdown).await;

        // The handler replaced the default abort action: still running.
        assert!(shutdown.is_triggered());
        assert!(!handle.is_finished());

        handle.abort();
    }
}
