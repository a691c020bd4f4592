//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the data
//! server address, the login timeout, the landing policy for unknown roles,
//! and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/resq/config.json`. The environment
//! variables `RESQ_API_URL` and `RESQ_LOGIN_TIMEOUT_SECS` override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::DEFAULT_BASE_URL;
use crate::guard::UnrecognizedRolePolicy;
use crate::session::DEFAULT_LOGIN_TIMEOUT_SECS;

/// Application name used for config directory paths
const APP_NAME: &str = "resq";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_API_URL: &str = "RESQ_API_URL";
const ENV_LOGIN_TIMEOUT: &str = "RESQ_LOGIN_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub login_timeout_secs: u64,
    pub unrecognized_role_policy: UnrecognizedRolePolicy,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            login_timeout_secs: DEFAULT_LOGIN_TIMEOUT_SECS,
            unrecognized_role_policy: UnrecognizedRolePolicy::default(),
            last_email: None,
        }
    }
}

impl Config {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_LOGIN_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.login_timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid {}", ENV_LOGIN_TIMEOUT),
            }
        }
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs.max(1))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
