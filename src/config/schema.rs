//! Configuration schema definitions.
//!
//! Tunables live in an optional TOML file; every field has a default so an
//! empty file (or no file) is valid. Secrets never appear here: they come
//! from the environment as [`Credentials`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Root configuration for the node.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    /// Worker pool settings.
    pub worker: WorkerConfig,

    /// Sample verifier settings.
    pub verifier: VerifierConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// How a worker waits between iterations.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaitMode {
    /// Wake early when shutdown is requested.
    #[default]
    Interruptible,
    /// Always sleep the full poll interval.
    Fixed,
}

/// Worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of workers to start.
    pub count: usize,

    /// Delay between iterations in milliseconds.
    pub poll_interval_ms: u64,

    /// Poll wait behaviour.
    pub wait_mode: WaitMode,
}

impl WorkerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            count: 1,
            poll_interval_ms: 5000,
            wait_mode: WaitMode::default(),
        }
    }
}

/// Sample verifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct VerifierConfig {
    /// Timeout for a single sample request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Required secrets read from the environment at startup.
#[derive(Clone)]
pub struct Credentials {
    /// Service endpoint samples are collected from.
    pub endpoint: Url,

    /// Hex-encoded secp256k1 private key. Never logged.
    pub private_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint.as_str())
            .field("private_key", &"<redacted>")
            .finish()
    }
}
