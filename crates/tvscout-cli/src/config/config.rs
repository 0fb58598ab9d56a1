//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tvscout_api::tmdb::TmdbCredential;

/// Environment variable holding a TMDB v3 API key.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Environment variable holding a TMDB v4 read access token.
pub const API_TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB access settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search tuning.
    #[serde(default)]
    pub search: SearchConfig,
}

/// TMDB access configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// v3 API key, sent as the `api_key` query parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// v4 read access token, sent as a bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// API base URL override (e.g. a local mirror).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Search configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Detail requests in flight per search.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

const fn default_concurrency() -> usize {
    1
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Resolves the TMDB credential from the process environment and this config.
    ///
    /// # Errors
    ///
    /// Returns an error if no credential is configured anywhere.
    pub fn resolve_credential(&self) -> Result<TmdbCredential> {
        self.resolve_credential_with(|name| std::env::var(name).ok())
    }

    /// Resolves the TMDB credential using `lookup` for environment variables.
    ///
    /// Precedence: `TMDB_API_TOKEN`, `TMDB_API_KEY`, then `[tmdb] api_token`
    /// and `[tmdb] api_key`. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if no credential is configured anywhere.
    pub fn resolve_credential_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<TmdbCredential> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        if let Some(token) = non_blank(lookup(API_TOKEN_ENV)) {
            return Ok(TmdbCredential::BearerToken(token));
        }
        if let Some(key) = non_blank(lookup(API_KEY_ENV)) {
            return Ok(TmdbCredential::ApiKey(key));
        }
        if let Some(token) = non_blank(self.tmdb.api_token.clone()) {
            return Ok(TmdbCredential::BearerToken(token));
        }
        if let Some(key) = non_blank(self.tmdb.api_key.clone()) {
            return Ok(TmdbCredential::ApiKey(key));
        }
        bail!(
            "TMDB credential is required: set {API_TOKEN_ENV} or {API_KEY_ENV}, \
             or api_token/api_key under [tmdb] in config.toml"
        )
    }

    /// Effective detail-fetch concurrency (at least 1).
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.search.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.tmdb.api_key.is_none());
        assert!(config.tmdb.api_token.is_none());
        assert_eq!(config.search.concurrency, 1);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            tmdb: TmdbConfig {
                api_key: Some(String::from("k3y")),
                api_token: None,
                base_url: Some(String::from("http://localhost:8080/3/")),
            },
            search: SearchConfig { concurrency: 4 },
        };

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb]\napi_key = \"abc\"\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.tmdb.api_key.as_deref(), Some("abc"));
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_credential_missing_everywhere() {
        // Arrange
        let config = AppConfig::default();

        // Act
        let err = config.resolve_credential_with(no_env).unwrap_err();

        // Assert
        assert!(err.to_string().contains("TMDB credential is required"));
    }

    #[test]
    fn test_credential_env_token_wins() {
        // Arrange
        let config = AppConfig {
            tmdb: TmdbConfig {
                api_key: Some(String::from("file-key")),
                ..TmdbConfig::default()
            },
            ..AppConfig::default()
        };

        // Act
        let credential = config
            .resolve_credential_with(|name| {
                (name == API_TOKEN_ENV).then(|| String::from("env-token"))
            })
            .unwrap();

        // Assert
        assert_eq!(
            credential,
            TmdbCredential::BearerToken(String::from("env-token"))
        );
    }

    #[test]
    fn test_credential_env_key_beats_config() {
        // Arrange
        let config = AppConfig {
            tmdb: TmdbConfig {
                api_token: Some(String::from("file-token")),
                ..TmdbConfig::default()
            },
            ..AppConfig::default()
        };

        // Act
        let credential = config
            .resolve_credential_with(|name| (name == API_KEY_ENV).then(|| String::from("env-key")))
            .unwrap();

        // Assert
        assert_eq!(credential, TmdbCredential::ApiKey(String::from("env-key")));
    }

    #[test]
    fn test_credential_falls_back_to_config_key() {
        // Arrange
        let config = AppConfig {
            tmdb: TmdbConfig {
                api_key: Some(String::from("file-key")),
                ..TmdbConfig::default()
            },
            ..AppConfig::default()
        };

        // Act
        let credential = config.resolve_credential_with(no_env).unwrap();

        // Assert
        assert_eq!(credential, TmdbCredential::ApiKey(String::from("file-key")));
    }

    #[test]
    fn test_credential_ignores_blank_values() {
        // Arrange
        let config = AppConfig {
            tmdb: TmdbConfig {
                api_token: Some(String::from("  ")),
                api_key: Some(String::from("file-key")),
                ..TmdbConfig::default()
            },
            ..AppConfig::default()
        };

        // Act
        let credential = config
            .resolve_credential_with(|_| Some(String::new()))
            .unwrap();

        // Assert
        assert_eq!(credential, TmdbCredential::ApiKey(String::from("file-key")));
    }

    #[test]
    fn test_concurrency_never_zero() {
        // Arrange
        let config = AppConfig {
            search: SearchConfig { concurrency: 0 },
            ..AppConfig::default()
        };

        // Act & Assert
        assert_eq!(config.concurrency(), 1);
    }
}
