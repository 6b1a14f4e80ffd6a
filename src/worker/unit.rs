//! The opaque operation a worker runs once per poll iteration.

use async_trait::async_trait;

use crate::node::types::NodeResult;

/// A self-contained unit of work.
///
/// Implementations own their I/O and error reporting. An `Err` is logged by
/// the worker and otherwise ignored.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Run the unit of work once.
    async fn run_once(&self) -> NodeResult<()>;
}
