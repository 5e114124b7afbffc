//! Environment configuration for the Shipyard server.

use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Server settings resolved from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (`SHIPYARD_HOST`).
    pub host: String,
    /// Listen port (`SHIPYARD_PORT`).
    pub port: u16,
    /// CORS origins allowed to call the API (`SHIPYARD_UI_ORIGINS`).
    pub allowed_origins: Vec<String>,
    /// PostgreSQL connection string (`DATABASE_URL`); `None` selects the in-memory store.
    pub database_url: Option<String>,
}

impl ServerConfig {
    /// Build the configuration from the process environment.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SHIPYARD_HOST")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("SHIPYARD_PORT") {
            Some(raw) => u16::from_str(raw.trim())
                .map_err(|_| format!("SHIPYARD_PORT must be a u16 number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };
        let origins = lookup("SHIPYARD_UI_ORIGINS").unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string());
        let allowed_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
        let database_url = lookup("DATABASE_URL").filter(|value| !value.trim().is_empty());

        Ok(Self {
            host,
            port,
            allowed_origins,
            database_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).expect("config");

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.allowed_origins,
            vec!["http://127.0.0.1:4200", "http://localhost:4200"]
        );
        assert!(config.database_url.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("SHIPYARD_HOST", "0.0.0.0"),
            ("SHIPYARD_PORT", "9090"),
            ("SHIPYARD_UI_ORIGINS", " https://a.example , ,https://b.example"),
            ("DATABASE_URL", "postgres://localhost/ships"),
        ])
        .expect("config");

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/ships")
        );
    }

    #[test]
    fn rejects_invalid_port() {
        let err = config_from(&[("SHIPYARD_PORT", "harbor")]).unwrap_err();

        assert!(err.contains("SHIPYARD_PORT"));
    }

    #[test]
    fn blank_database_url_selects_memory_store() {
        let config = config_from(&[("DATABASE_URL", "  ")]).expect("config");

        assert!(config.database_url.is_none());
    }
}
