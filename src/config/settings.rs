//! Environment-driven settings. A `.env` file is honoured when the binary
//! calls `dotenvy::dotenv()` before [`Settings::from_env`].

use crate::error::ConfigError;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/products";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub port: u16,
    /// The only origin allowed to make cross-origin requests.
    pub frontend_url: Option<String>,
    pub db_max_connections: u32,
    pub store_backend: StoreBackend,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.into(),
            port: DEFAULT_PORT,
            frontend_url: None,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            store_backend: StoreBackend::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset and empty values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Settings::default();
        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            frontend_url: get("FRONTEND_URL"),
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                get("DB_MAX_CONNECTIONS"),
                defaults.db_max_connections,
            )?,
            store_backend: match get("STORE_BACKEND") {
                Some(v) => v.parse()?,
                None => defaults.store_backend,
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.socket_addr().port(), 4000);
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("PORT", "8080"),
            ("FRONTEND_URL", "http://localhost:5173"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("STORE_BACKEND", "Memory"),
        ])
        .unwrap();
        assert_eq!(s.database_url, "postgres://db/app");
        assert_eq!(s.port, 8080);
        assert_eq!(s.frontend_url.as_deref(), Some("http://localhost:5173"));
        assert_eq!(s.db_max_connections, 12);
        assert_eq!(s.store_backend, StoreBackend::Memory);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let s = settings(&[("PORT", ""), ("FRONTEND_URL", "  ")]).unwrap();
        assert_eq!(s.port, DEFAULT_PORT);
        assert_eq!(s.frontend_url, None);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(matches!(
            settings(&[("PORT", "cuatro mil")]),
            Err(ConfigError::InvalidValue { key: "PORT", .. })
        ));
        assert!(matches!(
            settings(&[("STORE_BACKEND", "sqlite")]),
            Err(ConfigError::UnknownBackend(_))
        ));
    }
}
