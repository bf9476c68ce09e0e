//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::query::PageConfig;

/// Runtime configuration for the catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Socket address the server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HMAC secret for signing access tokens
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Default number of records per collection page
    #[serde(default = "default_per_page")]
    pub per_page: u64,

    /// Upper bound the `limit` parameter is clamped to
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,

    /// Access token lifetime in minutes
    #[serde(default = "default_token_expiry_minutes")]
    pub token_expiry_minutes: i64,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_secret_key() -> String {
    "dev only".to_string()
}

fn default_per_page() -> u64 {
    5
}

fn default_max_limit() -> u64 {
    100
}

fn default_token_expiry_minutes() -> i64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            secret_key: default_secret_key(),
            per_page: default_per_page(),
            max_limit: default_max_limit(),
            token_expiry_minutes: default_token_expiry_minutes(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply environment overrides (`BIND_ADDR`, `SECRET_KEY`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Ok(secret) = std::env::var("SECRET_KEY") {
            self.secret_key = secret;
        }
        self
    }

    /// Pagination settings for the query engine
    pub fn page_config(&self) -> PageConfig {
        PageConfig {
            default_limit: self.per_page,
            max_limit: self.max_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.per_page, 5);
        assert_eq!(config.max_limit, 100);
        assert_eq!(config.token_expiry_minutes, 30);
    }

    #[test]
    fn test_from_yaml_str_with_partial_keys() {
        let config = ApiConfig::from_yaml_str("secret_key: s3cret\nper_page: 10\n")
            .expect("should parse");
        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.per_page, 10);
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_page_config() {
        let mut config = ApiConfig::default();
        config.per_page = 7;
        let pages = config.page_config();
        assert_eq!(pages.default_limit, 7);
        assert_eq!(pages.max_limit, 100);
    }
}
