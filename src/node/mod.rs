//! Node business logic.
//!
//! # Data Flow
//! ```text
//! PRIVATE_KEY (environment)
//!     → identity.rs (key parsing, compressed public key, signing)
//!
//! Each poll iteration (verifier.rs):
//!     GET endpoint → sample bytes
//!     → keccak-256 digest → sign with node identity
//!     → recover signer → must equal node address
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - Every request to the endpoint has a timeout

pub mod identity;
pub mod types;
pub mod verifier;

pub use identity::NodeIdentity;
pub use types::{NodeError, NodeResult, Verification};
pub use verifier::SampleVerifier;
