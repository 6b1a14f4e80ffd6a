//! Node types and error definitions.

use alloy::primitives::{Address, B256};
use alloy::signers::Signature;
use thiserror::Error;

/// Errors raised by the node's unit of work and identity handling.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Invalid private key format or key derivation failure.
    #[error("Identity error: {0}")]
    Identity(String),

    /// Fetching a sample from the endpoint failed.
    #[error("Sample collection failed: {0}")]
    Collect(String),

    /// The sample could not be verified.
    #[error("Sample verification failed: {0}")]
    Verify(String),

    /// HTTP client could not be constructed.
    #[error("Client error: {0}")]
    Client(String),
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// A node's signed attestation over a sample.
#[derive(Debug, Clone)]
pub struct Verification {
    /// Keccak-256 digest of the sample.
    pub digest: B256,
    /// Signature over the digest.
    pub signature: Signature,
    /// Address of the attesting identity.
    pub signer: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NodeError::Collect("connection refused".to_string());
        assert_eq!(err.to_string(), "Sample collection failed: connection refused");

        let err = NodeError::Identity("bad key".to_string());
        assert!(err.to_string().starts_with("Identity error"));
    }
}
