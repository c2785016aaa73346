//! Configuration for the points service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listen address for the gateway
    pub listen_addr: String,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Optional JSON seed file applied before serving requests
    pub seed_file: Option<PathBuf>,

    /// Actor mailbox capacity (bounded channel, backpressure)
    pub mailbox_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            service_name: "points-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            seed_file: None,
            mailbox_capacity: 1024,
        }
    }
}

impl Config {
    /// Load from TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load defaults with environment variable overrides
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(addr) = std::env::var("POINTS_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(seed_file) = std::env::var("POINTS_SEED_FILE") {
            config.seed_file = Some(PathBuf::from(seed_file));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "points-ledger");
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert!(config.seed_file.is_none());
        assert_eq!(config.mailbox_capacity, 1024);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
listen_addr = "127.0.0.1:9999"
service_name = "points-ledger"
service_version = "0.1.0"
seed_file = "transactions.json"
mailbox_capacity = 64
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9999");
        assert_eq!(config.seed_file, Some(PathBuf::from("transactions.json")));
        assert_eq!(config.mailbox_capacity, 64);
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen_addr = [not toml").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }
}
