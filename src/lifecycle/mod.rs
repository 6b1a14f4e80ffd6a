//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load credentials → Derive identity → Build unit of work → Start workers
//!
//! Supervision (supervisor.rs):
//!     start(n) → n workers loop independently
//!     shutdown() → signal fires → workers finish current iteration and exit
//!     wait_all() → one outcome per worker
//!
//! Shutdown (shutdown.rs):
//!     One-shot broadcast flag, single writer, many readers
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM/SIGABRT → Trigger graceful shutdown (once)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then identity, then workers
//! - Nothing is started if any startup step fails
//! - No forced exit: the poll interval bounds how long shutdown takes

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::{Shutdown, ShutdownListener};
pub use signals::SignalWatcher;
pub use startup::{bootstrap, Startup, StartupError};
pub use supervisor::{Supervisor, SupervisorError, SupervisorReport, WorkerOutcome};
