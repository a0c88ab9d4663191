use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

// ============================================================================
// Application Configuration
// ============================================================================
//
// Read once at startup from environment variables. Every setting has a
// default except the database URL: without one the service runs on the
// in-memory store.
//
// ============================================================================

#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size
    pub max_connections: u32,
    /// Connection attempts at startup before giving up
    pub connect_attempts: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            connect_attempts: 5,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: Option<DatabaseConfig>,
    /// JSON file with users and coffees for the in-memory store.
    pub fixtures_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("COFFEE_ORDERS_HOST") {
            config.http.host = host;
        }
        if let Some(port) = parse(&lookup, "COFFEE_ORDERS_PORT")? {
            config.http.port = port;
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            let mut database = DatabaseConfig::new(url);
            if let Some(max) = parse(&lookup, "DATABASE_MAX_CONNECTIONS")? {
                database.max_connections = max;
            }
            if let Some(attempts) = parse(&lookup, "DATABASE_CONNECT_ATTEMPTS")? {
                database.connect_attempts = attempts;
            }
            config.database = Some(database);
        }

        config.fixtures_path = lookup("COFFEE_ORDERS_FIXTURES").map(PathBuf::from);

        Ok(config)
    }
}

fn parse<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| raw.parse::<T>().with_context(|| format!("invalid value for {key}: {raw:?}")))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8080);
        assert!(config.database.is_none());
        assert!(config.fixtures_path.is_none());
    }

    #[test]
    fn test_database_settings() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://orders@localhost/orders"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("COFFEE_ORDERS_PORT", "9000"),
        ])
        .unwrap();

        let database = config.database.unwrap();
        assert_eq!(database.url, "postgres://orders@localhost/orders");
        assert_eq!(database.max_connections, 12);
        assert_eq!(database.connect_attempts, 5);
        assert_eq!(config.http.port, 9000);
    }

    #[test]
    fn test_empty_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "")]).unwrap();
        assert!(config.database.is_none());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = config_from(&[("COFFEE_ORDERS_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("COFFEE_ORDERS_PORT"));
    }
}
