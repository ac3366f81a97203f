use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::auth::KeyIdentity;
use crate::error::WeatherKitError;

pub const ENV_KEY_ID: &str = "WEATHERKIT_KEY_ID";
pub const ENV_SERVICE_ID: &str = "WEATHERKIT_SERVICE_ID";
pub const ENV_TEAM_ID: &str = "WEATHERKIT_TEAM_ID";
pub const ENV_PRIVATE_KEY: &str = "WEATHERKIT_PRIVATE_KEY";
pub const ENV_TOKEN: &str = "WEATHERKIT_TOKEN";

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings stored on disk.
///
/// Example TOML:
/// ```toml
/// key_id = "ABC123DEFG"
/// service_id = "com.example.weatherkit-client"
/// team_id = "TEAM123456"
/// private_key_path = "~/keys/AuthKey_ABC123DEFG.p8"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub key_id: Option<String>,
    pub service_id: Option<String>,
    pub team_id: Option<String>,
    pub private_key_path: Option<String>,

    /// Pre-issued token; when set, signing is skipped entirely.
    pub token: Option<String>,

    pub language: Option<String>,
    pub country: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Validated credential material, ready to hand to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Static(String),
    Signed(KeyIdentity),
}

impl ConnectionConfig {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: ConnectionConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherkit", "weatherkit-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Fill fields the config lacks from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_lookup(|name| std::env::var(name).ok())
    }

    /// Per-field overlay: a value already present in the config always wins.
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fill_from(&mut self.key_id, lookup(ENV_KEY_ID));
        fill_from(&mut self.service_id, lookup(ENV_SERVICE_ID));
        fill_from(&mut self.team_id, lookup(ENV_TEAM_ID));
        fill_from(&mut self.private_key_path, lookup(ENV_PRIVATE_KEY));
        fill_from(&mut self.token, lookup(ENV_TOKEN));
        self
    }

    /// Names of identity fields that are absent or blank, in declaration order.
    pub fn missing_identity_fields(&self) -> Vec<&'static str> {
        [
            ("key_id", &self.key_id),
            ("service_id", &self.service_id),
            ("team_id", &self.team_id),
            ("private_key_path", &self.private_key_path),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Resolve the credentials: a static token if one is set, otherwise the full key identity.
    pub fn credentials(&self) -> Result<Credentials, WeatherKitError> {
        if let Some(token) = present(&self.token) {
            return Ok(Credentials::Static(token.to_owned()));
        }

        match (
            present(&self.key_id),
            present(&self.service_id),
            present(&self.team_id),
            present(&self.private_key_path),
        ) {
            (Some(key_id), Some(service_id), Some(team_id), Some(path)) => {
                Ok(Credentials::Signed(KeyIdentity {
                    key_id: key_id.to_owned(),
                    service_id: service_id.to_owned(),
                    team_id: team_id.to_owned(),
                    private_key_path: PathBuf::from(path),
                }))
            }
            _ => Err(WeatherKitError::MissingFields(self.missing_identity_fields())),
        }
    }

    pub fn language(&self) -> &str {
        present(&self.language).unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn country(&self) -> &str {
        present(&self.country).unwrap_or(DEFAULT_COUNTRY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn fill_from(slot: &mut Option<String>, fallback: Option<String>) {
    if present(slot).is_none()
        && let Some(value) = fallback.filter(|v| !v.trim().is_empty())
    {
        *slot = Some(value);
    }
}
