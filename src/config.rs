// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the intake guard.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! config file, and `KOMAK_`-prefixed environment variables (a `.env` file
//! is loaded first if present). Nested keys use `__`, e.g.
//! `KOMAK_COOLDOWN__WINDOW_MS=30000`.

use crate::error::ConfigError;
use crate::submission::FormVariant;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "KOMAK";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Which form this deployment serves (default: application)
    #[serde(default)]
    pub variant: FormVariant,

    /// Resubmission cooldown configuration
    #[serde(default)]
    pub cooldown: CooldownConfig,

    /// Durable local storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote persistence configuration
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Resubmission cooldown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Cooldown window after a successful submission in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Key under which the last submission timestamp is stored
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

/// Durable local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON file backing the key-value store
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

/// Remote persistence (PostgREST) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: Option<String>,

    /// Public (anon) API key
    #[serde(default)]
    pub anon_key: Option<String>,

    /// Database schema (default: public)
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Target table; falls back to the variant's table when unset
    #[serde(default)]
    pub table: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines (default: true)
    #[serde(default = "default_true")]
    pub json: bool,
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_storage_key() -> String {
    "komak_last_submission_time".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".komak/state.json")
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: FormVariant::default(),
            cooldown: CooldownConfig::default(),
            storage: StorageConfig::default(),
            persistence: PersistenceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            storage_key: default_storage_key(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            schema: default_schema(),
            table: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from `.env`, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is the normal case outside development.
        let _ = dotenvy::dotenv();

        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Table that accepted submissions are written to.
    pub fn table(&self) -> &str {
        self.persistence
            .table
            .as_deref()
            .unwrap_or_else(|| self.variant.default_table())
    }
}

impl CooldownConfig {
    /// Get the cooldown window
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl PersistenceConfig {
    /// Resolve the REST endpoint and API key, failing when either is absent.
    pub fn credentials(&self) -> Result<(Url, String), ConfigError> {
        let url = match self.url.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => u,
            _ => return Err(ConfigError::MissingCredential("KOMAK_PERSISTENCE__URL")),
        };
        let key = match self.anon_key.as_deref().map(str::trim) {
            Some(k) if !k.is_empty() => k.to_string(),
            _ => return Err(ConfigError::MissingCredential("KOMAK_PERSISTENCE__ANON_KEY")),
        };

        let parsed = Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidUrl {
                url: url.to_string(),
                source: url::ParseError::EmptyHost,
            });
        }

        Ok((parsed, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.variant, FormVariant::Application);
        assert_eq!(config.cooldown.window(), Duration::from_secs(60));
        assert_eq!(config.cooldown.storage_key, "komak_last_submission_time");
        assert_eq!(config.persistence.schema, "public");
        assert_eq!(config.table(), "applications");
    }

    #[test]
    fn test_table_override() {
        let mut config = Config::default();
        config.variant = FormVariant::Survey;
        assert_eq!(config.table(), "survey_responses");

        config.persistence.table = Some("responses_2026".to_string());
        assert_eq!(config.table(), "responses_2026");
    }

    #[test]
    fn test_missing_credentials() {
        let config = PersistenceConfig::default();
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingCredential("KOMAK_PERSISTENCE__URL"))
        ));

        let config = PersistenceConfig {
            url: Some("https://project.supabase.co".to_string()),
            anon_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingCredential("KOMAK_PERSISTENCE__ANON_KEY"))
        ));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = PersistenceConfig {
            url: Some("file:///etc/passwd".to_string()),
            anon_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: Config = serde_json::from_str(
            r#"{ "variant": "survey", "cooldown": { "window_ms": 1000 } }"#,
        )
        .unwrap();
        assert_eq!(config.variant, FormVariant::Survey);
        assert_eq!(config.cooldown.window_ms, 1000);
        assert_eq!(config.cooldown.storage_key, "komak_last_submission_time");
        assert!(config.logging.json);
    }
}
