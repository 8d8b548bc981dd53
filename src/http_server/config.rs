//! HTTP Server Configuration
//!
//! Configuration for the HTTP server including host, port, and CORS settings.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 54321)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    54321
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 54321);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
    }
}
