use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::currency::CurrencySet;

/// Which localized currency name the source record should provide.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NameLanguage {
    #[default]
    Uz,
    Uzc,
    Ru,
    En,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CbuProviderConfig {
    pub base_url: String,
    #[serde(default = "default_rates_path")]
    pub path: String,
    #[serde(default)]
    pub name_language: NameLanguage,
}

impl Default for CbuProviderConfig {
    fn default() -> Self {
        CbuProviderConfig {
            base_url: "https://cbu.uz".to_string(),
            path: default_rates_path(),
            name_language: NameLanguage::default(),
        }
    }
}

fn default_rates_path() -> String {
    "/uz/arkhiv-kursov-valyut/json/".to_string()
}

fn default_base_currency() -> String {
    "UZS".to_string()
}

fn default_from() -> String {
    "USD".to_string()
}

fn default_to() -> String {
    "UZS".to_string()
}

/// One week.
const MAX_REFRESH_INTERVAL_MINS: u64 = 7 * 24 * 60;
const MAX_DEBOUNCE_MS: u64 = 10_000;

fn default_refresh_interval_mins() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    300
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: CbuProviderConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub currencies: CurrencySet,
    #[serde(default = "default_from")]
    pub default_from: String,
    #[serde(default = "default_to")]
    pub default_to: String,
    #[serde(default = "default_refresh_interval_mins")]
    pub refresh_interval_mins: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: CbuProviderConfig::default(),
            base_currency: default_base_currency(),
            currencies: CurrencySet::default(),
            default_from: default_from(),
            default_to: default_to(),
            refresh_interval_mins: default_refresh_interval_mins(),
            debounce_ms: default_debounce_ms(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to the
    /// built-in defaults when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("uz", "pullarim", "pullarim")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("uz", "pullarim", "pullarim")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currencies.is_empty() {
            bail!("At least one currency must be configured");
        }
        for (field, code) in [
            ("base_currency", &self.base_currency),
            ("default_from", &self.default_from),
            ("default_to", &self.default_to),
        ] {
            if !self.currencies.contains(code) {
                bail!("{field} '{code}' is not in the configured currencies");
            }
        }
        if !(1..=MAX_REFRESH_INTERVAL_MINS).contains(&self.refresh_interval_mins) {
            bail!("refresh_interval_mins must be between 1 and {MAX_REFRESH_INTERVAL_MINS}");
        }
        if !(1..=MAX_DEBOUNCE_MS).contains(&self.debounce_ms) {
            bail!("debounce_ms must be between 1 and {MAX_DEBOUNCE_MS}");
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_mins.saturating_mul(60))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn rates_url(&self) -> String {
        format!(
            "{}{}",
            self.provider.base_url.trim_end_matches('/'),
            self.provider.path
        )
    }
}
