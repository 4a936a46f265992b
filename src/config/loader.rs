//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MultichainConfig;
use crate::rpc::types::InvalidArgument;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment override {name}: {reason}")]
    Env { name: &'static str, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    #[error("Transport setup failed: {0}")]
    Transport(String),
}

/// Load configuration from a TOML file, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<MultichainConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: MultichainConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |name| env::var(name).ok())?;
    config.transport_kind()?;

    tracing::debug!(
        path = %path.display(),
        host = %config.rpc.host,
        port = config.rpc.port,
        "Configuration loaded"
    );

    Ok(config)
}

/// Load `path` when given, otherwise defaults plus `MULTICHAIN_*` overrides.
pub fn load_or_default(path: Option<&Path>) -> Result<MultichainConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => config_from_env(|name| env::var(name).ok()),
    }
}

/// Defaults with overrides from the given variable lookup.
pub fn config_from_env<F>(lookup: F) -> Result<MultichainConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = MultichainConfig::default();
    apply_env_overrides(&mut config, lookup)?;
    Ok(config)
}

/// Apply `MULTICHAIN_*` overrides using the given variable lookup.
pub fn apply_env_overrides<F>(config: &mut MultichainConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("MULTICHAIN_RPC_HOST") {
        config.rpc.host = host;
    }
    if let Some(port) = lookup("MULTICHAIN_RPC_PORT") {
        config.rpc.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "MULTICHAIN_RPC_PORT",
            reason: format!("'{}' is not a port number", port),
        })?;
    }
    if let Some(username) = lookup("MULTICHAIN_RPC_USERNAME") {
        config.rpc.username = username;
    }
    // Never logged.
    if let Some(password) = lookup("MULTICHAIN_RPC_PASSWORD") {
        config.rpc.password = password;
    }
    if let Some(chain_name) = lookup("MULTICHAIN_CHAIN_NAME") {
        config.chain_name = Some(chain_name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_applied() {
        let mut config = MultichainConfig::default();
        let lookup = lookup_from(&[
            ("MULTICHAIN_RPC_HOST", "node.internal"),
            ("MULTICHAIN_RPC_PORT", "6001"),
            ("MULTICHAIN_RPC_PASSWORD", "s3cret"),
            ("MULTICHAIN_CHAIN_NAME", "procurement"),
        ]);
        apply_env_overrides(&mut config, lookup).unwrap();

        assert_eq!(config.rpc.host, "node.internal");
        assert_eq!(config.rpc.port, 6001);
        assert_eq!(config.rpc.username, "multichainrpc");
        assert_eq!(config.rpc.password, "s3cret");
        assert_eq!(config.chain_name.as_deref(), Some("procurement"));
    }

    #[test]
    fn test_bad_port_override_rejected() {
        let mut config = MultichainConfig::default();
        let err = apply_env_overrides(&mut config, lookup_from(&[("MULTICHAIN_RPC_PORT", "x")]))
            .unwrap_err();
        assert!(err.to_string().contains("MULTICHAIN_RPC_PORT"));
    }

    #[test]
    fn test_defaults_pick_up_env_password() {
        let config = config_from_env(lookup_from(&[("MULTICHAIN_RPC_PASSWORD", "from-env")])).unwrap();
        assert_eq!(config.rpc.password, "from-env");
        assert_eq!(config.rpc.host, "127.0.0.1");
    }

    #[test]
    fn test_load_rejects_unknown_transport() {
        let path = std::env::temp_dir().join(format!("multichain-rpc-ftp-{}.toml", std::process::id()));
        fs::write(&path, "transport = \"ftp\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(matches!(err, ConfigError::InvalidArgument(_)));
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/multichain.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("multichain-rpc-{}.toml", std::process::id()));
        fs::write(
            &path,
            r#"
            use_ssl = true
            verify_ssl = false
            transport = "curl"
            streams = ["procurement.documents"]

            [rpc]
            host = "chain.example"
            port = 8571
            username = "rpcuser"
            password = "pw"
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(config.use_ssl);
        assert!(!config.verify_ssl);
        assert_eq!(config.transport.as_deref(), Some("curl"));
        assert_eq!(config.streams, vec!["procurement.documents".to_string()]);
        assert_eq!(config.rpc.port, 8571);
    }
}
