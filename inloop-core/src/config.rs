//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "storage": "file", "latencyMs": 800, "passwordHashing": false }
//! }
//! ```
//! Keys this crate does not manage are preserved on save. Each `app` value
//! can be overridden from the environment (`INLOOP_STORAGE`,
//! `INLOOP_LATENCY_MS`, `INLOOP_PASSWORD_HASHING`).

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::CredentialScheme;
use crate::services::{SessionOptions, DEFAULT_LATENCY};

/// Which adapter backs the session records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per record under `storage/`
    #[default]
    File,
    /// A `sys_kv` table in `inloop.duckdb`
    DuckDb,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::File => f.write_str("file"),
            StorageBackend::DuckDb => f.write_str("duckdb"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(StorageBackend::File),
            "duckdb" => Ok(StorageBackend::DuckDb),
            other => anyhow::bail!("Unknown storage backend: {}. Available: file, duckdb", other),
        }
    }
}

fn default_latency_ms() -> u64 {
    DEFAULT_LATENCY.as_millis() as u64
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    storage: StorageBackend,
    #[serde(default = "default_latency_ms")]
    latency_ms: u64,
    #[serde(default)]
    password_hashing: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            latency_ms: default_latency_ms(),
            password_hashing: false,
            other: HashMap::new(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

/// Inloop configuration (simplified view of settings)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub storage: StorageBackend,
    pub latency_ms: u64,
    pub password_hashing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(SettingsFile::default(), |_| None)
    }
}

impl Config {
    fn read_settings(inloop_dir: &Path) -> Result<SettingsFile> {
        let settings_path = inloop_dir.join("settings.json");
        if !settings_path.exists() {
            return Ok(SettingsFile::default());
        }

        let content = std::fs::read_to_string(&settings_path)?;
        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable settings.json: {}", e);
            SettingsFile::default()
        }))
    }

    /// Load config from the data directory, applying environment overrides
    pub fn load(inloop_dir: &Path) -> Result<Self> {
        let raw = Self::read_settings(inloop_dir)?;
        Ok(Self::from_settings(raw, |name| std::env::var(name).ok()))
    }

    /// Load only what settings.json says, ignoring the environment.
    ///
    /// Use this before [`save`](Self::save) so overrides never get persisted.
    pub fn load_saved(inloop_dir: &Path) -> Result<Self> {
        let raw = Self::read_settings(inloop_dir)?;
        Ok(Self::from_settings(raw, |_| None))
    }

    /// Change one `app` setting, addressed by its settings.json name
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "storage" => self.storage = value.parse()?,
            "latencyMs" | "latency-ms" => {
                self.latency_ms = value
                    .trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid latencyMs '{}': {}", value, e))?
            }
            "passwordHashing" | "password-hashing" => {
                self.password_hashing = parse_flag(value.trim())
                    .ok_or_else(|| anyhow::anyhow!("Invalid passwordHashing '{}': expected true or false", value))?
            }
            other => anyhow::bail!(
                "Unknown setting: {}. Available: storage, latencyMs, passwordHashing",
                other
            ),
        }
        Ok(())
    }

    /// Build a config from parsed settings and an environment lookup.
    ///
    /// Unparseable override values are ignored with a warning.
    fn from_settings(raw: SettingsFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let storage = match env("INLOOP_STORAGE").map(|v| v.parse::<StorageBackend>()) {
            Some(Ok(backend)) => backend,
            Some(Err(e)) => {
                tracing::warn!("ignoring INLOOP_STORAGE: {}", e);
                raw.app.storage
            }
            None => raw.app.storage,
        };

        let latency_ms = match env("INLOOP_LATENCY_MS").map(|v| v.trim().parse::<u64>()) {
            Some(Ok(ms)) => ms,
            Some(Err(e)) => {
                tracing::warn!("ignoring INLOOP_LATENCY_MS: {}", e);
                raw.app.latency_ms
            }
            None => raw.app.latency_ms,
        };

        let password_hashing = env("INLOOP_PASSWORD_HASHING")
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(raw.app.password_hashing);

        Self {
            storage,
            latency_ms,
            password_hashing,
        }
    }

    /// Save config to the data directory, preserving unmanaged settings
    pub fn save(&self, inloop_dir: &Path) -> Result<()> {
        let settings_path = inloop_dir.join("settings.json");

        let mut settings = Self::read_settings(inloop_dir)?;

        settings.app.storage = self.storage;
        settings.app.latency_ms = self.latency_ms;
        settings.app.password_hashing = self.password_hashing;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Session store tunables derived from this config
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            latency: Duration::from_millis(self.latency_ms),
            credential_scheme: if self.password_hashing {
                CredentialScheme::Argon2
            } else {
                CredentialScheme::Plaintext
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.latency_ms, 800);
        assert_eq!(config.session_options().credential_scheme, CredentialScheme::Plaintext);
    }

    #[test]
    fn test_env_overrides() {
        let raw: SettingsFile =
            serde_json::from_str(r#"{"app":{"storage":"duckdb","latencyMs":5}}"#).unwrap();
        let config = Config::from_settings(raw, |name| match name {
            "INLOOP_STORAGE" => Some("file".into()),
            "INLOOP_LATENCY_MS" => Some("not a number".into()),
            "INLOOP_PASSWORD_HASHING" => Some("yes".into()),
            _ => None,
        });

        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.latency_ms, 5);
        assert!(config.password_hashing);
        assert_eq!(config.session_options().credential_scheme, CredentialScheme::Argon2);
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app":{"theme":"dark"},"feed":{"pageSize":20}}"#,
        )
        .unwrap();

        let mut config = Config::load_saved(dir.path()).unwrap();
        config.set_value("storage", "duckdb").unwrap();
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("settings.json")).unwrap())
                .unwrap();
        assert_eq!(saved["app"]["storage"], "duckdb");
        assert_eq!(saved["app"]["theme"], "dark");
        assert_eq!(saved["feed"]["pageSize"], 20);
    }

    #[test]
    fn test_set_value_and_reload() {
        let dir = tempdir().unwrap();
        let mut config = Config::load_saved(dir.path()).unwrap();

        config.set_value("latencyMs", "0").unwrap();
        config.set_value("password-hashing", "yes").unwrap();
        assert!(config.set_value("latencyMs", "soon").is_err());
        assert!(config.set_value("theme", "dark").is_err());
        config.save(dir.path()).unwrap();

        let reloaded = Config::load_saved(dir.path()).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.latency_ms, 0);
        assert_eq!(reloaded.session_options().latency, Duration::ZERO);
        assert_eq!(reloaded.session_options().credential_scheme, CredentialScheme::Argon2);
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("DuckDB".parse::<StorageBackend>().unwrap(), StorageBackend::DuckDb);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
