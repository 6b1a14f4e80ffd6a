//! Shutdown coordination for the node.

use std::sync::Arc;
use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// Holds a one-shot flag that every long-running task can observe. Once
/// triggered it stays triggered; there is no way to reset it.
#[derive(Clone)]
pub struct Shutdown {
    /// Watch channel sender, shared by every clone.
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the shutdown signal.
    ///
    /// Returns `true` if this call flipped the flag, `false` if shutdown had
    /// already been requested. Works with no listeners attached.
    pub fn trigger(&self) -> bool {
        self.tx.send_if_modified(|triggered| {
            if *triggered {
                false
            } else {
                *triggered = true;
                true
            }
        })
    }

    /// Whether shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Get the number of active listeners (tasks still holding a subscription).
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Shutdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shutdown")
            .field("triggered", &self.is_triggered())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Read-only view of a [`Shutdown`] flag.
///
/// Observing never consumes the signal: every listener sees the same state,
/// as many times as it asks.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Whether shutdown has been requested.
    ///
    /// A listener whose coordinator has been dropped reports `true`.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Wait until shutdown is requested (or the coordinator is dropped).
    pub async fn triggered(&mut self) {
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trigger_is_idempotent() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_triggered());

        assert!(shutdown.trigger());
        assert!(!shutdown.trigger());
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn test_trigger_without_listeners() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.listener_count(), 0);
        assert!(shutdown.trigger());
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn test_every_listener_sees_the_same_state() {
        let shutdown = Shutdown::new();
        let a = shutdown.subscribe();
        let b = shutdown.subscribe();
        assert_eq!(shutdown.listener_count(), 2);

        shutdown.trigger();

        // Repeated reads do not consume the signal.
        for _ in 0..3 {
            assert!(a.is_triggered());
            assert!(b.is_triggered());
        }

        // Late subscribers observe it too.
        assert!(shutdown.subscribe().is_triggered());
    }

    #[test]
    fn test_dropped_coordinator_cancels_listener() {
        let shutdown = Shutdown::new();
        let listener = shutdown.subscribe();
        assert!(!listener.is_triggered());

        drop(shutdown);
        assert!(listener.is_triggered());
    }

    #[tokio::test]
    async fn test_triggered_wakes_waiting_task() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();

        let waiter = tokio::spawn(async move {
            listener.triggered().await;
            listener.is_triggered()
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        shutdown.trigger();

        let observed = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("listener should wake")
            .unwrap();
        assert!(observed);
    }

    #[tokio::test]
    async fn test_triggered_returns_immediately_when_already_set() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let mut listener = shutdown.subscribe();
        tokio::time::timeout(Duration::from_millis(100), listener.triggered())
            .await
            .expect("already triggered");
    }
}
