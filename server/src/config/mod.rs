use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ApiError, Result};

pub const DEFAULT_MAX_BODY_BYTES: usize = 5000;
pub const DEFAULT_MAX_TODOS: usize = 20;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub max_todos: usize,
    pub seed_todos: bool,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    /// HMAC key for auth tokens. A random key is generated at startup when
    /// unset, which invalidates previously issued tokens on restart.
    pub secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4567,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_todos: DEFAULT_MAX_TODOS,
            seed_todos: true,
            auth: AuthConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password".to_string(),
            secret: None,
        }
    }
}

impl ServerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ServerConfig = toml::from_str(content)
            .map_err(|e| ApiError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Applies `SERVER_HOST`, `SERVER_PORT` and `AUTH_TOKEN_SECRET`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ApiError::Config(format!("Invalid SERVER_PORT: {}", port)))?;
        }
        if let Ok(secret) = std::env::var("AUTH_TOKEN_SECRET") {
            self.auth.secret = Some(secret);
        }

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.max_todos == 0 {
            return Err(ApiError::Config("max_todos must be at least 1".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(ApiError::Config(
                "max_body_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
host = "127.0.0.1"
port = 8080
max_body_bytes = 4096
max_todos = 5
seed_todos = false

[auth]
username = "root"
password = "hunter2"
secret = "0123456789abcdef0123456789abcdef"
        "#;

        let config = ServerConfig::from_toml(toml_content).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_body_bytes, 4096);
        assert_eq!(config.max_todos, 5);
        assert!(!config.seed_todos);
        assert_eq!(config.auth.username, "root");
        assert!(config.auth.secret.is_some());
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = ServerConfig::from_toml("port = 9000").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.max_todos, DEFAULT_MAX_TODOS);
        assert!(config.seed_todos);
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.auth.password, "password");
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(ServerConfig::from_toml("max_todos = 0").is_err());
    }
}
