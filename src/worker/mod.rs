//! Worker subsystem.
//!
//! # Data Flow
//! ```text
//! Supervisor spawns Worker (runner.rs)
//!     loop:
//!         shutdown observed? → ShuttingDown → exit
//!         UnitOfWork::run_once (unit.rs), errors logged and swallowed
//!         wait poll interval (interruptible or fixed)
//!     → Stopped → WorkerReport back to the supervisor
//! ```
//!
//! # Design Decisions
//! - Cancellation is checked before every invocation, never during one
//! - A failing unit of work never ends the loop
//! - No retry or backoff: every iteration runs on the fixed schedule

pub mod runner;
pub mod unit;

pub use runner::{WaitMode, Worker, WorkerId, WorkerReport, WorkerState};
pub use unit::UnitOfWork;
