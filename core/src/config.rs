//! Resolution of the API URL from the environment.
//!
//! Development talks to the server directly on `host:port`; production sits
//! behind a reverse proxy and only knows the proxy origin. Both append the
//! server's context path and the `/api` prefix.

use crate::error::ConfigError;

pub const ENV_MODE: &str = "PERSONS_MODE";
pub const ENV_HOST: &str = "PERSONS_API_HOST";
pub const ENV_PORT: &str = "PERSONS_API_PORT";
pub const ENV_BASE: &str = "PERSONS_API_BASE";
pub const ENV_ORIGIN: &str = "PERSONS_API_ORIGIN";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_BASE: &str = "/sgu-api";
const DEFAULT_ORIGIN: &str = "http://localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl std::str::FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub mode: Mode,
    pub host: String,
    pub port: u16,
    pub base: String,
    pub origin: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Development,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base: DEFAULT_BASE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

impl ApiConfig {
    /// Read the `PERSONS_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset or empty keys take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(mode) = get(ENV_MODE) {
            config.mode = mode.parse()?;
        }
        if let Some(host) = get(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(base) = get(ENV_BASE) {
            config.base = base;
        }
        if let Some(origin) = get(ENV_ORIGIN) {
            config.origin = origin;
        }
        Ok(config)
    }

    /// The URL `PersonClient` appends resource paths to.
    pub fn api_url(&self) -> String {
        let base = normalize_base(&self.base);
        match self.mode {
            Mode::Production => format!("{}{base}/api", self.origin.trim_end_matches('/')),
            Mode::Development => format!("http://{}:{}{base}/api", self.host, self.port),
        }
    }
}

/// `sgu-api/` and `/sgu-api` both become `/sgu-api`; `/` becomes empty.
fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_dev_server() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.mode, Mode::Development);
        assert_eq!(config.api_url(), "http://localhost:8081/sgu-api/api");
    }

    #[test]
    fn development_uses_host_port_and_base() {
        let config = ApiConfig::from_lookup(lookup(&[
            (ENV_HOST, "10.0.0.5"),
            (ENV_PORT, "9000"),
            (ENV_BASE, "people/"),
        ]))
        .unwrap();
        assert_eq!(config.api_url(), "http://10.0.0.5:9000/people/api");
    }

    #[test]
    fn production_ignores_host_and_port() {
        let config = ApiConfig::from_lookup(lookup(&[
            (ENV_MODE, "production"),
            (ENV_HOST, "ignored"),
            (ENV_ORIGIN, "https://sgu.example.org/"),
        ]))
        .unwrap();
        assert_eq!(config.api_url(), "https://sgu.example.org/sgu-api/api");
    }

    #[test]
    fn root_base_collapses() {
        let config = ApiConfig::from_lookup(lookup(&[(ENV_BASE, "/")])).unwrap();
        assert_eq!(config.api_url(), "http://localhost:8081/api");
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[(ENV_PORT, ""), (ENV_MODE, " ")])).unwrap();
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn bad_port_and_mode_are_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("eighty".to_string()));

        let err = ApiConfig::from_lookup(lookup(&[(ENV_MODE, "staging")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownMode("staging".to_string()));
    }
}
