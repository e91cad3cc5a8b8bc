use serde::{Deserialize, Serialize};

use crate::error::{Result, StepwiseError};

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL. Falls back to the `DATABASE_URL` environment
    /// variable when unset.
    #[serde(default)]
    pub url: Option<String>,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// Resolve the connection URL from the config or the environment.
    pub fn resolve_url(&self) -> Result<String> {
        if let Some(url) = &self.url {
            if !url.is_empty() {
                return Ok(url.clone());
            }
        }

        std::env::var("DATABASE_URL").map_err(|_| {
            StepwiseError::Config(
                "No database URL configured: set [database].url or the DATABASE_URL environment variable".to_string(),
            )
        })
    }
}

fn default_connect_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url_from_config() {
        let config = DatabaseConfig {
            url: Some("postgres://localhost/db".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_url().unwrap(), "postgres://localhost/db");
    }

    #[test]
    fn test_resolve_url_missing() {
        std::env::remove_var("DATABASE_URL");
        let config = DatabaseConfig::default();
        assert!(config.resolve_url().is_err());
    }
}
