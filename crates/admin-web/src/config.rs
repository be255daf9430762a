//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use pipeline::TargetRegion;

/// Admin web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// City and region the dashboard highlights.
    pub target: TargetRegion,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ADMIN_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:data/contacts.db?mode=rwc` |
    /// | `TARGET_CITY` | Target city | `Pune` |
    /// | `TARGET_REGION` | Target region (state) | `Maharashtra` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup("ADMIN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite:data/contacts.db?mode=rwc".to_string());

        let city = lookup("TARGET_CITY").unwrap_or_else(|| "Pune".to_string());
        let region = lookup("TARGET_REGION").unwrap_or_else(|| "Maharashtra".to_string());
        if city.trim().is_empty() || region.trim().is_empty() {
            return Err(ConfigError::EmptyTarget);
        }

        Ok(Self {
            addr,
            database_url,
            target: TargetRegion::new(&city, &region),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ADMIN_ADDR format")]
    InvalidAddr,

    #[error("TARGET_CITY and TARGET_REGION cannot be empty")]
    EmptyTarget,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8788");
        assert_eq!(config.database_url, "sqlite:data/contacts.db?mode=rwc");
        assert_eq!(config.target, TargetRegion::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ADMIN_ADDR", "0.0.0.0:9000"),
            ("TARGET_CITY", "nagpur"),
            ("TARGET_REGION", "Maharashtra"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.target.city, "Nagpur");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("ADMIN_ADDR", "nope")]),
            Err(ConfigError::InvalidAddr)
        ));
        assert!(matches!(
            config_from(&[("TARGET_CITY", " ")]),
            Err(ConfigError::EmptyTarget)
        ));
    }
}
