//! Runtime configuration, read from the environment

use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SWIFT_DB_PATH";
pub const ENV_BIND_ADDR: &str = "SWIFT_BIND_ADDR";
pub const ENV_FEED_PATH: &str = "SWIFT_FEED_PATH";

/// Directory configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,

    /// HTTP listen address
    pub bind_addr: String,

    /// CSV feed loaded at server startup, if any
    pub feed_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: PathBuf::from("swift_codes.db"),
            bind_addr: "0.0.0.0:8080".to_string(),
            feed_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or empty keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        Config {
            database_path: get(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            bind_addr: get(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
            feed_path: get(ENV_FEED_PATH).map(PathBuf::from),
        }
    }
}
