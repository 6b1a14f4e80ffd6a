//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → NodeConfig (validated, immutable)
//!
//! environment (.env file + process env)
//!     → loader.rs (required GRPC_URL, PRIVATE_KEY)
//!     → Credentials
//!
//! Both are read once at startup and passed by value to the
//! supervisor and the unit of work. Nothing reads the environment later.
//! ```
//!
//! # Design Decisions
//! - All settings have defaults; credentials have none
//! - A missing credential is fatal, no retry, no partial startup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{Credentials, NodeConfig, ObservabilityConfig, VerifierConfig, WorkerConfig};
