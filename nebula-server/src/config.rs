use std::env;
use std::str::FromStr;

use nebula_persistence::connection::DEFAULT_DATABASE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid {
                key: "STORAGE_BACKEND",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub storage_backend: StorageBackend,
    /// Allowed CORS origins; `*` allows any origin.
    pub cors_origins: Vec<String>,
    pub leaderboard_max_limit: u64,
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cors_origins = parse_origins(&get("CORS_ORIGINS", "*"))?;

        Ok(Self {
            host: get("HOST", "127.0.0.1"),
            port: parse_value("PORT", &get("PORT", "8001"))?,
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            storage_backend: get("STORAGE_BACKEND", "sqlite").parse()?,
            cors_origins,
            leaderboard_max_limit: parse_value(
                "LEADERBOARD_MAX_LIMIT",
                &get("LEADERBOARD_MAX_LIMIT", "100"),
            )?,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            storage_backend: StorageBackend::Sqlite,
            cors_origins: vec!["*".to_string()],
            leaderboard_max_limit: 100,
        }
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    // warp panics on origins without a scheme, so reject them here
    if let Some(bad) = origins
        .iter()
        .find(|origin| *origin != "*" && !origin.contains("://"))
    {
        return Err(ConfigError::Invalid {
            key: "CORS_ORIGINS",
            value: bad.clone(),
        });
    }

    Ok(origins)
}
