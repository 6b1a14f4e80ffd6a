//! Sample collection and verification.
//!
//! # Responsibilities
//! - Fetch a sample from the configured endpoint
//! - Attest it: digest and sign with the node identity
//! - Verify an attestation against a sample and the node's address
//!
//! This is a local stand-in for the external verification service: the node
//! checks its own attestation, so a failed check means the sample changed or
//! the attestation was made by another key.

use alloy::primitives::keccak256;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::schema::VerifierConfig;
use crate::node::identity::NodeIdentity;
use crate::node::types::{NodeError, NodeResult, Verification};
use crate::worker::unit::UnitOfWork;

/// The node's unit of work: collect one sample and verify it.
#[derive(Clone)]
pub struct SampleVerifier {
    client: reqwest::Client,
    endpoint: Url,
    identity: NodeIdentity,
}

impl SampleVerifier {
    /// Create a verifier for `endpoint`.
    pub fn new(endpoint: Url, identity: NodeIdentity, config: &VerifierConfig) -> NodeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("light-node/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NodeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            identity,
        })
    }

    /// Fetch one sample from the endpoint.
    pub async fn collect_sample(&self) -> NodeResult<Vec<u8>> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| NodeError::Collect(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NodeError::Collect(format!("endpoint returned status {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NodeError::Collect(e.to_string()))?;
        if body.is_empty() {
            return Err(NodeError::Collect("endpoint returned an empty sample".to_string()));
        }

        Ok(body.to_vec())
    }

    /// Sign the sample digest with the node identity.
    pub async fn attest(&self, sample: &[u8]) -> NodeResult<Verification> {
        if sample.is_empty() {
            return Err(NodeError::Verify("sample is empty".to_string()));
        }

        let digest = keccak256(sample);
        let signature = self.identity.sign_digest(digest).await?;

        Ok(Verification {
            digest,
            signature,
            signer: self.identity.address(),
        })
    }

    /// Check that `attestation` covers `sample` and was signed by this node.
    pub fn verify(&self, sample: &[u8], attestation: &Verification) -> NodeResult<()> {
        let digest = keccak256(sample);
        if digest != attestation.digest {
            return Err(NodeError::Verify(format!(
                "sample digest {} does not match attested digest {}",
                digest, attestation.digest
            )));
        }

        let signer = attestation
            .signature
            .recover_address_from_prehash(&digest)
            .map_err(|e| NodeError::Verify(format!("Signature recovery failed: {}", e)))?;

        if signer != self.identity.address() {
            return Err(NodeError::Verify(format!(
                "recovered signer {} does not match node address {}",
                signer,
                self.identity.address()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for SampleVerifier {
    async fn run_once(&self) -> NodeResult<()> {
        let sample = self.collect_sample().await?;
        let verification = self.attest(&sample).await?;
        self.verify(&sample, &verification)?;

        tracing::info!(
            endpoint = %self.endpoint,
            sample_bytes = sample.len(),
            digest = %verification.digest,
            "Sample verified"
        );
        Ok(())
    }
}

impl std::fmt::Debug for SampleVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleVerifier")
            .field("endpoint", &self.endpoint.as_str())
            .field("address", &self.identity.address())
            .finish()
    }
}
