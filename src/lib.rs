//! Light node library.
//!
//! A background process that collects and verifies a sample on a fixed poll
//! interval and shuts down cleanly on SIGINT, SIGTERM or SIGABRT.

pub mod config;
pub mod lifecycle;
pub mod node;
pub mod observability;
pub mod worker;

pub use config::NodeConfig;
pub use lifecycle::{Shutdown, Supervisor};
pub use worker::UnitOfWork;
