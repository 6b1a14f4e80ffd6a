//! Node identity derived from the operator's private key.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};

use crate::node::types::{NodeError, NodeResult};

/// Length of a SEC1 compressed secp256k1 public key in bytes.
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;

/// Signing identity of this node.
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl NodeIdentity {
    /// Create an identity from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> NodeResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| NodeError::Identity(format!("Invalid private key format: {}", e)))?;

        Ok(Self { signer })
    }

    /// Get the identity's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// SEC1 compressed public key bytes (`0x02`/`0x03` prefix + X coordinate).
    pub fn compressed_public_key_bytes(&self) -> NodeResult<Vec<u8>> {
        let point = self.signer.credential().verifying_key().to_encoded_point(true);
        let bytes = point.as_bytes();
        if bytes.len() != COMPRESSED_PUBLIC_KEY_LEN {
            return Err(NodeError::Identity(format!(
                "Compressed public key has {} bytes, expected {}",
                bytes.len(),
                COMPRESSED_PUBLIC_KEY_LEN
            )));
        }
        Ok(bytes.to_vec())
    }

    /// Hex-encoded compressed public key, without `0x` prefix.
    pub fn compressed_public_key(&self) -> NodeResult<String> {
        self.compressed_public_key_bytes().map(alloy::hex::encode)
    }

    /// Sign a 32-byte digest.
    pub async fn sign_digest(&self, digest: B256) -> NodeResult<Signature> {
        self.signer
            .sign_hash(&digest)
            .await
            .map_err(|e| NodeError::Verify(format!("Signing failed: {}", e)))
    }
}
