//! Configuration module for the suggestions backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the primary SQLite database file
    pub db_path: PathBuf,
    /// Path to the fallback JSON document
    pub fallback_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Timeout budget for a single store attempt
    pub store_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("SUGGEST_DB_PATH")
            .unwrap_or_else(|_| "./data/suggestions.sqlite".to_string())
            .into();

        let fallback_path = env::var("SUGGEST_FALLBACK_PATH")
            .unwrap_or_else(|_| "./data/suggestions.json".to_string())
            .into();

        let bind_addr = env::var("SUGGEST_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid SUGGEST_BIND_ADDR format");

        let log_level = env::var("SUGGEST_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let store_timeout_ms: u64 = env::var("SUGGEST_STORE_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .expect("Invalid SUGGEST_STORE_TIMEOUT_MS format");

        Self {
            db_path,
            fallback_path,
            bind_addr,
            log_level,
            store_timeout: Duration::from_millis(store_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("SUGGEST_DB_PATH");
        env::remove_var("SUGGEST_FALLBACK_PATH");
        env::remove_var("SUGGEST_BIND_ADDR");
        env::remove_var("SUGGEST_LOG_LEVEL");
        env::remove_var("SUGGEST_STORE_TIMEOUT_MS");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/suggestions.sqlite"));
        assert_eq!(
            config.fallback_path,
            PathBuf::from("./data/suggestions.json")
        );
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.store_timeout, Duration::from_millis(5000));
    }
}
