use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";

/// Settings for the device-position lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// When false the host is treated as having no geolocation at all.
    pub enabled: bool,

    /// When false the user has refused location access.
    pub allowed: bool,

    /// IP-geolocation endpoint returning `{"status", "lat", "lon"}`.
    pub url: String,

    pub timeout_secs: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed: true,
            url: DEFAULT_GEOLOCATION_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// forecast_days = 10
/// chart_path = "forecast.svg"
///
/// [geolocation]
/// allowed = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub forecast_days: u8,

    /// HTTP timeout for geocoding and forecast calls.
    pub timeout_secs: u64,

    /// Where the forecast chart is drawn.
    pub chart_path: PathBuf,

    pub geolocation: GeolocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            forecast_days: 10,
            timeout_secs: 30,
            chart_path: PathBuf::from("forecast.svg"),
            geolocation: GeolocationConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathernow", "weathernow")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Open-Meteo accepts 1..=16 forecast days.
    pub fn validate(&self) -> Result<()> {
        if !(1..=16).contains(&self.forecast_days) {
            return Err(anyhow!(
                "forecast_days must be between 1 and 16, got {}",
                self.forecast_days
            ));
        }
        if self.timeout_secs == 0 || self.geolocation.timeout_secs == 0 {
            return Err(anyhow!("timeouts must be at least one second"));
        }
        Ok(())
    }
}
