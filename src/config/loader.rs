//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::config::schema::{Credentials, NodeConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the service endpoint.
pub const ENDPOINT_ENV_VAR: &str = "GRPC_URL";

/// Environment variable holding the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    EnvFile(dotenvy::Error),
    MissingEnv(&'static str),
    InvalidEndpoint(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::EnvFile(e) => write!(f, "Error loading env file: {}", e),
            ConfigError::MissingEnv(name) => write!(f, "{} is not set", name),
            ConfigError::InvalidEndpoint(e) => write!(f, "Invalid {}: {}", ENDPOINT_ENV_VAR, e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<NodeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: NodeConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load a dotenv file into the process environment.
///
/// An explicit `path` must exist. Without one, `.env` in the working
/// directory is loaded if present. Returns the file that was loaded.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(ConfigError::EnvFile)?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(loaded) => Ok(Some(loaded)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(ConfigError::EnvFile(e)),
        },
    }
}

/// Read the required credentials through `lookup`.
///
/// `lookup` is `std::env::var` in production; tests pass a map. Blank values
/// count as missing.
pub fn load_credentials<F>(lookup: F) -> Result<Credentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |name: &'static str| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingEnv(name))
    };

    let endpoint = required(ENDPOINT_ENV_VAR)?;
    let private_key = required(PRIVATE_KEY_ENV_VAR)?;

    let endpoint = Url::parse(&endpoint)
        .map_err(|e| ConfigError::InvalidEndpoint(format!("'{}': {}", endpoint, e)))?;

    Ok(Credentials {
        endpoint,
        private_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_load_credentials() {
        let credentials = load_credentials(lookup(&[
            ("GRPC_URL", "http://localhost:50051"),
            ("PRIVATE_KEY", "0xabc"),
        ]))
        .unwrap();
        assert_eq!(credentials.endpoint.as_str(), "http://localhost:50051/");
        assert_eq!(credentials.private_key, "0xabc");
    }

    #[test]
    fn test_missing_endpoint() {
        let err = load_credentials(lookup(&[("PRIVATE_KEY", "0xabc")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("GRPC_URL")));
        assert_eq!(err.to_string(), "GRPC_URL is not set");
    }

    #[test]
    fn test_blank_private_key_is_missing() {
        let err = load_credentials(lookup(&[
            ("GRPC_URL", "http://localhost:50051"),
            ("PRIVATE_KEY", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("PRIVATE_KEY")));
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = load_credentials(lookup(&[
            ("GRPC_URL", "not a url"),
            ("PRIVATE_KEY", "0xabc"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_load_config_file() {
        let path = std::env::temp_dir().join(format!("light-node-config-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[worker]\ncount = 2\npoll_interval_ms = 100").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.worker.count, 2);
        assert_eq!(config.worker.poll_interval_ms, 100);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let path = std::env::temp_dir().join(format!("light-node-invalid-{}.toml", std::process::id()));
        fs::write(&path, "[worker]\ncount = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("worker.count"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_explicit_env_file_must_exist() {
        let err = load_env_file(Some(Path::new("/nonexistent/light-node/.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile(_)));
    }
}
