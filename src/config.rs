//! Client configuration.
//!
//! Configuration is stored in `<config dir>/lightfeedback/config.yaml` (or the
//! file named by `LFB_CONFIG`) and includes:
//! - The API base URL
//! - The acting user for this client
//! - Page size and request timeout
//! - An optional bearer token
//!
//! `LFB_BASE_URL`, `LFB_USER` and `LFB_TOKEN` take precedence over the file.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{FeedbackError, Result};
use crate::types::{PAGE_SIZE_DEFAULT, PAGE_SIZE_MAX};

pub const CONFIG_ENV: &str = "LFB_CONFIG";
pub const BASE_URL_ENV: &str = "LFB_BASE_URL";
pub const USER_ENV: &str = "LFB_USER";
pub const TOKEN_ENV: &str = "LFB_TOKEN";

pub const VALID_KEYS: &[&str] = &["base_url", "user", "page_size", "timeout_secs", "auth.token"];

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_page_size() -> u32 {
    PAGE_SIZE_DEFAULT
}

fn default_timeout_secs() -> u64 {
    30
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the feedback API, including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Acting user attributed to every create, update and comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Items per page (clamped to the server maximum)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds (0 = no timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Authentication
    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user: None,
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthConfig {
    pub fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Read a non-empty environment variable
fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = env_non_empty(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "lightfeedback").ok_or_else(|| {
            FeedbackError::Config(format!(
                "could not determine a config directory; set {CONFIG_ENV}"
            ))
        })?;
        Ok(dirs.config_dir().join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            FeedbackError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            FeedbackError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Owner read/write only, the file may hold a token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Base URL from environment or config file
    pub fn base_url(&self) -> String {
        env_non_empty(BASE_URL_ENV).unwrap_or_else(|| self.base_url.clone())
    }

    /// Acting user from environment or config file, if either sets one
    pub fn user(&self) -> Option<String> {
        env_non_empty(USER_ENV).or_else(|| self.user.clone().filter(|u| !u.trim().is_empty()))
    }

    /// Bearer token from environment or config file
    pub fn token(&self) -> Option<String> {
        env_non_empty(TOKEN_ENV).or_else(|| {
            self.auth
                .token
                .clone()
                .filter(|t| !t.trim().is_empty())
        })
    }

    /// Page size clamped to `1..=PAGE_SIZE_MAX`
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, PAGE_SIZE_MAX)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Read a value by its dotted key. Tokens are never returned in full.
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "base_url" => Some(self.base_url()),
            "user" => self.user(),
            "page_size" => Some(self.page_size().to_string()),
            "timeout_secs" => Some(self.timeout_secs.to_string()),
            "auth.token" => self.token().map(|t| mask_sensitive_value(&t)),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a value by its dotted key, validating it first
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                url::Url::parse(value)?;
                self.base_url = value.trim_end_matches('/').to_string();
            }
            "user" => {
                let user = value.trim();
                if user.is_empty() {
                    return Err(FeedbackError::Config("user cannot be empty".to_string()));
                }
                self.user = Some(user.to_string());
            }
            "page_size" => {
                let size: u32 = value.parse().map_err(|_| {
                    FeedbackError::Config(format!("invalid page_size '{value}'"))
                })?;
                if size == 0 || size > PAGE_SIZE_MAX {
                    return Err(FeedbackError::Config(format!(
                        "page_size must be between 1 and {PAGE_SIZE_MAX}"
                    )));
                }
                self.page_size = size;
            }
            "timeout_secs" => {
                self.timeout_secs = value.parse().map_err(|_| {
                    FeedbackError::Config(format!("invalid timeout_secs '{value}'"))
                })?;
            }
            "auth.token" => {
                let token = value.trim();
                if token.is_empty() {
                    return Err(FeedbackError::Config("auth.token cannot be empty".to_string()));
                }
                self.auth.token = Some(token.to_string());
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> FeedbackError {
    FeedbackError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    ))
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.page_size(), 20);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_config_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml_ng::from_str("user: alice\n").unwrap();
        assert_eq!(config.user.as_deref(), Some("alice"));
        assert_eq!(config.page_size, PAGE_SIZE_DEFAULT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_page_size_clamped() {
        let config = Config {
            page_size: 500,
            ..Default::default()
        };
        assert_eq!(config.page_size(), PAGE_SIZE_MAX);

        let config = Config {
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(config.page_size(), 1);
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = Config {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_set_value_validates() {
        let mut config = Config::default();
        config.set_value("page_size", "50").unwrap();
        assert_eq!(config.page_size, 50);
        assert!(config.set_value("page_size", "101").is_err());
        assert!(config.set_value("page_size", "abc").is_err());
        assert!(config.set_value("base_url", "not a url").is_err());
        assert!(config.set_value("user", "   ").is_err());
        assert!(config.set_value("nope", "x").is_err());

        config
            .set_value("base_url", "https://feedback.example.com/api/")
            .unwrap();
        assert_eq!(config.base_url, "https://feedback.example.com/api");
    }

    #[test]
    fn test_auth_debug_is_redacted() {
        let auth = AuthConfig {
            token: Some("supersecret".to_string()),
        };
        let debug = format!("{auth:?}");
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let mut config = Config::default();
        let err = config.set_value("auth.token", "  ").unwrap_err();
        assert!(err.to_string().contains("auth.token cannot be empty"));
        assert!(config.auth.token.is_none());
    }

    #[test]
    #[serial]
    fn test_blank_token_in_file_is_ignored() {
        let config = Config {
            auth: AuthConfig {
                token: Some(String::new()),
            },
            ..Default::default()
        };
        unsafe { env::remove_var(TOKEN_ENV) };
        assert_eq!(config.token(), None);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.set_value("user", "bob").unwrap();
        config.set_value("auth.token", "tok_12345").unwrap();

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed: Config = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed.user.as_deref(), Some("bob"));
        assert_eq!(parsed.auth.token.as_deref(), Some("tok_12345"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_values() {
        let config = Config {
            base_url: "http://file.example.com/api".to_string(),
            auth: AuthConfig {
                token: Some("from-file".to_string()),
            },
            ..Default::default()
        };

        unsafe {
            env::set_var(BASE_URL_ENV, "http://env.example.com/api");
            env::set_var(TOKEN_ENV, "from-env");
        }
        assert_eq!(config.base_url(), "http://env.example.com/api");
        assert_eq!(config.token().as_deref(), Some("from-env"));

        unsafe {
            env::remove_var(BASE_URL_ENV);
            env::remove_var(TOKEN_ENV);
        }
        assert_eq!(config.base_url(), "http://file.example.com/api");
        assert_eq!(config.token().as_deref(), Some("from-file"));
    }

    #[test]
    #[serial]
    fn test_save_and_load_from_config_env() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.yaml");
        unsafe { env::set_var(CONFIG_ENV, &path) };

        assert_eq!(Config::load().unwrap().page_size, PAGE_SIZE_DEFAULT);

        let mut config = Config::default();
        config.set_value("page_size", "40").unwrap();
        config.set_value("auth.token", "tok_abcdef").unwrap();
        config.save().unwrap();
        assert!(path.exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.page_size, 40);
        assert_eq!(loaded.auth.token.as_deref(), Some("tok_abcdef"));

        unsafe { env::remove_var(CONFIG_ENV) };
    }

    #[test]
    fn test_mask_sensitive_value() {
        assert_eq!(mask_sensitive_value("abcdef"), "ab...ef");
        assert_eq!(mask_sensitive_value("abcd"), "****");
        assert_eq!(mask_sensitive_value("日本語中文"), "日本...中文");
    }
}
