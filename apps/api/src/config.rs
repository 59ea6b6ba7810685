//! Vault API configuration module.
//!
//! Configuration is loaded from an optional TOML file, then environment
//! variables override individual values, then defaults fill the rest.
//!
//! ```text
//! defaults ──► VAULT_CONFIG (toml file) ──► VAULT_* env vars ──► validate
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use vault_db::{DbConfig, SchemaSource};

/// Vault API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Interface to listen on
    pub bind_addr: String,

    /// HTTP port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Schema script on disk; unset uses the embedded `sql/init.sql`
    pub schema_path: Option<PathBuf>,

    /// Pool size
    pub db_max_connections: u32,

    /// Per-request deadline in milliseconds
    pub request_timeout_ms: u64,

    /// How long in-flight requests may keep running after a shutdown signal
    pub shutdown_grace_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "0.0.0.0".to_string(),
            http_port: 8080,
            database_path: PathBuf::from("./vault.db"),
            schema_path: None,
            db_max_connections: 5,
            request_timeout_ms: 5_000,
            shutdown_grace_ms: 10_000,
        }
    }
}

impl ApiConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the environment.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("VAULT_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(addr) = lookup("VAULT_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(path) = lookup("VAULT_DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("VAULT_SCHEMA_PATH") {
            config.schema_path = Some(PathBuf::from(path));
        }
        override_parsed(&lookup, "VAULT_HTTP_PORT", &mut config.http_port)?;
        override_parsed(&lookup, "VAULT_DB_MAX_CONNECTIONS", &mut config.db_max_connections)?;
        override_parsed(&lookup, "VAULT_REQUEST_TIMEOUT_MS", &mut config.request_timeout_ms)?;
        override_parsed(&lookup, "VAULT_SHUTDOWN_GRACE_MS", &mut config.shutdown_grace_ms)?;

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("VAULT_DB_MAX_CONNECTIONS".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("VAULT_REQUEST_TIMEOUT_MS".to_string()));
        }
        Ok(())
    }

    /// `host:port` to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.http_port)
    }

    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Shutdown grace period.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        let schema = match &self.schema_path {
            Some(path) => SchemaSource::File(path.clone()),
            None => SchemaSource::Embedded,
        };
        DbConfig::new(&self.database_path)
            .max_connections(self.db_max_connections)
            .min_connections(1)
            .schema(schema)
    }
}

fn override_parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string()))?;
    }
    Ok(())
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Cannot read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config file: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::load_from(lookup(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.db_config().schema, SchemaSource::Embedded);
    }

    #[test]
    fn test_env_overrides() {
        let config = ApiConfig::load_from(lookup(&[
            ("VAULT_BIND_ADDR", "127.0.0.1"),
            ("VAULT_HTTP_PORT", "9000"),
            ("VAULT_DATABASE_PATH", "/data/items.db"),
            ("VAULT_SCHEMA_PATH", "/etc/vault/init.sql"),
            ("VAULT_DB_MAX_CONNECTIONS", " 8 "),
            ("VAULT_REQUEST_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.database_path, PathBuf::from("/data/items.db"));
        assert_eq!(config.request_timeout(), Duration::from_millis(250));

        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert_eq!(
            db.schema,
            SchemaSource::File(PathBuf::from("/etc/vault/init.sql"))
        );
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("VAULT_HTTP_PORT", "eighty"),
            ("VAULT_HTTP_PORT", "70000"),
            ("VAULT_DB_MAX_CONNECTIONS", "0"),
            ("VAULT_REQUEST_TIMEOUT_MS", "-1"),
        ] {
            let err = ApiConfig::load_from(lookup(&[(key, value)])).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidValue(k) if k == key),
                "{key}={value}: {err}"
            );
        }
    }

    #[test]
    fn test_toml_partial_file() {
        let config = ApiConfig::from_toml(
            r#"
            http_port = 3000
            database_path = "/srv/vault.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.database_path, PathBuf::from("/srv/vault.db"));
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.request_timeout_ms, 5_000);
    }

    #[test]
    fn test_toml_errors() {
        assert!(matches!(
            ApiConfig::from_toml("http_port = \"x\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ApiConfig::load_from(lookup(&[("VAULT_CONFIG", "/no/such/vault.toml")])),
            Err(ConfigError::Read { .. })
        ));
    }
}
