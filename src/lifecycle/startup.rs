//! Startup orchestration.
//!
//! # Responsibilities
//! - Load credentials and derive the node identity
//! - Build the unit of work
//! - Start the supervisor's workers
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Everything fallible runs before the first worker is spawned, so a
//!   failed startup leaves the supervisor with zero workers

use std::sync::Arc;
use thiserror::Error;

use crate::config::loader::{load_credentials, ConfigError};
use crate::config::schema::{Credentials, NodeConfig};
use crate::lifecycle::supervisor::{Supervisor, SupervisorError};
use crate::node::{NodeError, NodeIdentity, SampleVerifier};

/// Fatal errors raised before any worker starts.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to derive node identity: {0}")]
    Identity(#[source] NodeError),

    #[error("failed to build unit of work: {0}")]
    UnitOfWork(#[source] NodeError),

    #[error("failed to start workers: {0}")]
    Supervisor(#[from] SupervisorError),

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] std::io::Error),
}

/// Everything derived from configuration that the node needs to run.
#[derive(Debug)]
pub struct Startup {
    config: NodeConfig,
    credentials: Credentials,
    identity: NodeIdentity,
    public_key: String,
}

impl Startup {
    /// Derive the node identity from already loaded credentials.
    pub fn prepare(config: NodeConfig, credentials: Credentials) -> Result<Self, StartupError> {
        let identity =
            NodeIdentity::from_private_key(&credentials.private_key).map_err(StartupError::Identity)?;
        let public_key = identity.compressed_public_key().map_err(StartupError::Identity)?;

        Ok(Self {
            config,
            credentials,
            identity,
            public_key,
        })
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    /// Hex-encoded compressed public key, for diagnostics.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Build the sample verifier and start the configured number of workers.
    pub fn launch(&self, supervisor: &mut Supervisor) -> Result<(), StartupError> {
        let verifier = SampleVerifier::new(
            self.credentials.endpoint.clone(),
            self.identity.clone(),
            &self.config.verifier,
        )
        .map_err(StartupError::UnitOfWork)?;

        supervisor.start(self.config.worker.count, Arc::new(verifier))?;
        Ok(())
    }
}

/// Load credentials through `lookup`, derive the identity and start workers.
///
/// On error nothing has been started on `supervisor`.
pub fn bootstrap<F>(
    config: NodeConfig,
    lookup: F,
    supervisor: &mut Supervisor,
) -> Result<Startup, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = load_credentials(lookup)?;
    tracing::info!(endpoint = %credentials.endpoint, "Credentials loaded");

    let startup = Startup::prepare(config, credentials)?;
    tracing::info!(
        public_key = %startup.public_key(),
        address = %startup.identity().address(),
        "Node identity derived"
    );

    startup.launch(supervisor)?;
    Ok(startup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn test_config() -> NodeConfig {
        let mut config = NodeConfig::default();
        config.worker.poll_interval_ms = 20;
        config.verifier.request_timeout_secs = 1;
        config
    }

    fn supervisor() -> Supervisor {
        Supervisor::from_config(&test_config().worker)
    }

    #[tokio::test]
    async fn test_missing_endpoint_starts_no_workers() {
        let mut sup = supervisor();
        let err = bootstrap(test_config(), env(&[("PRIVATE_KEY", TEST_PRIVATE_KEY)]), &mut sup)
            .unwrap_err();

        assert!(matches!(err, StartupError::Config(ConfigError::MissingEnv("GRPC_URL"))));
        assert_eq!(sup.started(), 0);
    }

    #[tokio::test]
    async fn test_missing_private_key_starts_no_workers() {
        let mut sup = supervisor();
        let err = bootstrap(test_config(), env(&[("GRPC_URL", "http://127.0.0.1:9")]), &mut sup)
            .unwrap_err();

        assert!(matches!(err, StartupError::Config(ConfigError::MissingEnv("PRIVATE_KEY"))));
        assert_eq!(sup.started(), 0);
    }

    #[tokio::test]
    async fn test_invalid_key_starts_no_workers() {
        let mut sup = supervisor();
        let err = bootstrap(
            test_config(),
            env(&[("GRPC_URL", "http://127.0.0.1:9"), ("PRIVATE_KEY", "not-hex")]),
            &mut sup,
        )
        .unwrap_err();

        assert!(matches!(err, StartupError::Identity(_)));
        assert_eq!(sup.started(), 0);
    }

    #[tokio::test]
    async fn test_bootstrap_starts_configured_workers() {
        let config = test_config();
        let mut sup = supervisor();
        let startup = bootstrap(
            config,
            env(&[("GRPC_URL", "http://127.0.0.1:9"), ("PRIVATE_KEY", TEST_PRIVATE_KEY)]),
            &mut sup,
        )
        .unwrap();

        assert_eq!(sup.started(), 1);
        assert_eq!(startup.public_key().len(), 66);

        // The unreachable endpoint makes every run fail; workers keep going.
        tokio::time::sleep(Duration::from_millis(60)).await;
        sup.shutdown();
        let report = tokio::time::timeout(Duration::from_secs(5), sup.wait_all())
            .await
            .expect("workers should stop");
        assert_eq!(report.stopped(), 1);
        assert!(report.invocations() >= 1);
    }
}
