//! Configuration file
//!
//! ```json
//! {
//!   "database_path": "./cms.db",
//!   "host": "0.0.0.0",
//!   "port": 54321,
//!   "cors_origins": [],
//!   "jwt_secret": "...",
//!   "token_ttl_minutes": 60
//! }
//! ```
//!
//! Only `database_path` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::auth::JwtConfig;
use crate::http_server::HttpServerConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file (required)
    pub database_path: PathBuf,

    #[serde(flatten)]
    pub http: HttpServerConfig,

    /// Token signing secret; `serve` refuses to start without one
    #[serde(default)]
    pub jwt_secret: Option<String>,

    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

fn default_token_ttl_minutes() -> i64 {
    60
}

impl Config {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }
        if self.token_ttl_minutes <= 0 {
            return Err(CliError::config_error("token_ttl_minutes must be positive"));
        }
        if self.jwt_secret.as_deref().is_some_and(str::is_empty) {
            return Err(CliError::config_error("jwt_secret must not be empty"));
        }
        Ok(())
    }

    /// Token settings for `serve`, which has no fallback secret.
    pub fn jwt_config(&self) -> CliResult<JwtConfig> {
        let secret = self
            .jwt_secret
            .as_deref()
            .ok_or_else(|| CliError::config_error("jwt_secret is required to serve"))?;
        Ok(JwtConfig::new(
            secret,
            chrono::Duration::minutes(self.token_ttl_minutes),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = Config::parse(r#"{"database_path": "cms.db"}"#).unwrap();
        assert_eq!(config.database_path, PathBuf::from("cms.db"));
        assert_eq!(config.http, HttpServerConfig::default());
        assert_eq!(config.token_ttl_minutes, 60);
        assert!(config.jwt_secret.is_none());
        assert!(config.jwt_config().is_err());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"{
                "database_path": "/var/lib/cms.db",
                "host": "127.0.0.1",
                "port": 8000,
                "cors_origins": ["https://admin.example.com"],
                "jwt_secret": "s3cret",
                "token_ttl_minutes": 15
            }"#,
        )
        .unwrap();
        assert_eq!(config.http.socket_addr(), "127.0.0.1:8000");
        let jwt = config.jwt_config().unwrap();
        assert_eq!(jwt.secret, "s3cret");
        assert_eq!(jwt.ttl, chrono::Duration::minutes(15));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(Config::parse(r#"{}"#).is_err());
        assert!(Config::parse(r#"{"database_path": ""}"#).is_err());
        assert!(Config::parse(r#"{"database_path": "a.db", "token_ttl_minutes": 0}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typedcms.json");
        fs::write(&path, r#"{"database_path": "cms.db", "port": 9001}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.http.port, 9001);

        assert!(Config::load(&dir.path().join("missing.json")).is_err());
    }
}
