//! Server settings read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{EngineError, EngineResult};

/// Environment variable naming the configuration directory.
pub const CONFIG_DIR_VAR: &str = "PAYROLL_CONFIG_DIR";
/// Environment variable naming the listen address.
pub const BIND_ADDR_VAR: &str = "PAYROLL_BIND_ADDR";

const DEFAULT_CONFIG_DIR: &str = "./config/kr";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Directory passed to [`super::ConfigLoader::load`].
    pub config_dir: PathBuf,
    /// Address the server listens on.
    pub bind_addr: SocketAddr,
}

impl ServerSettings {
    /// Reads settings from the process environment.
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for unset
    /// variables.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_dir = lookup(CONFIG_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());

        let bind_addr_raw = lookup(BIND_ADDR_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr =
            bind_addr_raw
                .trim()
                .parse()
                .map_err(|e: std::net::AddrParseError| EngineError::ConfigParseError {
                    path: BIND_ADDR_VAR.to_string(),
                    message: format!("'{}': {}", bind_addr_raw, e),
                })?;

        Ok(Self {
            config_dir: PathBuf::from(config_dir),
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = ServerSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.config_dir, PathBuf::from("./config/kr"));
        assert_eq!(settings.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_values_from_environment() {
        let settings = ServerSettings::from_lookup(lookup_from(&[
            (CONFIG_DIR_VAR, "/etc/payroll"),
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(settings.config_dir, PathBuf::from("/etc/payroll"));
        assert_eq!(settings.bind_addr.port(), 9000);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let settings =
            ServerSettings::from_lookup(lookup_from(&[(CONFIG_DIR_VAR, "  ")])).unwrap();
        assert_eq!(settings.config_dir, PathBuf::from("./config/kr"));
    }

    #[test]
    fn test_invalid_bind_addr_rejected() {
        let result = ServerSettings::from_lookup(lookup_from(&[(BIND_ADDR_VAR, "not-an-addr")]));
        match result {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert_eq!(path, BIND_ADDR_VAR);
                assert!(message.contains("not-an-addr"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
