use std::env;
use std::fmt;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::with_security_headers;

/// Every database variable is read with this prefix, e.g. `CSV_IMPORTER_DB_HOST`.
pub const ENV_PREFIX: &str = "CSV_IMPORTER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(String),

    #[error("environment variable {key} is not a valid port: '{value}'")]
    InvalidPort { key: String, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub cors_allowed_origins: Option<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            match lookup(&key) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(ConfigError::Missing(key)),
            }
        };

        let db_host = required("DB_HOST")?;
        let port = required("DB_PORT")?;
        let db_port = port.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
            key: format!("{ENV_PREFIX}DB_PORT"),
            value: port.clone(),
        })?;
        let db_user = required("DB_USER")?;
        let db_password = required("DB_PASSWORD")?;
        let db_name = required("DB_NAME")?;

        let production = lookup("RUST_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            db_host,
            db_port,
            db_user,
            db_password,
            db_name,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS"),
            production,
        })
    }

    /// Postgres connection options. TLS is off and the session runs in UTC.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
            .ssl_mode(PgSslMode::Disable)
            .options([("timezone", "UTC")])
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("production", &self.production)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            ("CSV_IMPORTER_DB_HOST", "localhost"),
            ("CSV_IMPORTER_DB_PORT", "5432"),
            ("CSV_IMPORTER_DB_USER", "testuser"),
            ("CSV_IMPORTER_DB_PASSWORD", "testpass"),
            ("CSV_IMPORTER_DB_NAME", "testdb"),
        ]
    }

    fn with(key: &'static str, value: &'static str) -> Vec<(&'static str, &'static str)> {
        let mut vars = complete();
        vars.retain(|(k, _)| *k != key);
        vars.push((key, value));
        vars
    }

    #[test]
    fn test_reads_prefixed_variables() {
        let mut vars = complete();
        vars.push(("DB_HOST", "wrong_host"));

        let config = Config::from_lookup(lookup_from(&vars)).unwrap();

        assert_eq!(config.db_host, "localhost");
        assert_eq!(config.db_port, 5432);
        assert_eq!(config.db_user, "testuser");
        assert_eq!(config.db_password, "testpass");
        assert_eq!(config.db_name, "testdb");
        assert!(!config.production);
        assert!(config.cors_allowed_origins.is_none());
    }

    #[test]
    fn test_missing_variables_fail() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == "CSV_IMPORTER_DB_HOST"));

        let partial = [
            ("CSV_IMPORTER_DB_HOST", "localhost"),
            ("CSV_IMPORTER_DB_PORT", "5432"),
        ];
        let err = Config::from_lookup(lookup_from(&partial)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == "CSV_IMPORTER_DB_USER"));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let vars = with("CSV_IMPORTER_DB_NAME", "");
        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == "CSV_IMPORTER_DB_NAME"));
    }

    #[test]
    fn test_port_values() {
        for (value, ok) in [
            ("5432", true),
            ("3306", true),
            ("65535", true),
            ("0", true),
            ("65536", false),
            ("-1", false),
            ("5432.5", false),
            ("invalid_port", false),
        ] {
            let vars = with("CSV_IMPORTER_DB_PORT", value);
            let result = Config::from_lookup(lookup_from(&vars));
            assert_eq!(result.is_ok(), ok, "port value {value}");
            if let Err(err) = result {
                assert!(matches!(err, ConfigError::InvalidPort { .. }));
            }
        }
    }

    #[test]
    fn test_production_flag() {
        let mut vars = complete();
        vars.push(("RUST_ENV", "Production"));

        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert!(config.production);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config::from_lookup(lookup_from(&complete())).unwrap();
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("testpass"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_connect_options() {
        let vars = with("CSV_IMPORTER_DB_HOST", "db.example.com");
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        let options = config.connect_options();

        assert_eq!(options.get_host(), "db.example.com");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "testuser");
        assert_eq!(options.get_database(), Some("testdb"));
    }
}
