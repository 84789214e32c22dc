use anyhow::{Context, Result, anyhow, ensure};
use axum::http::HeaderValue;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Nominatim's usage policy rejects requests without an identifying agent.
pub const DEFAULT_USER_AGENT: &str = "WeatherApp";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_LOCATION_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Upstream endpoints. Overridable so tests and self-hosted mirrors can be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub weather_base_url: String,
    pub location_base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            location_base_url: DEFAULT_LOCATION_BASE_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// bind_addr = "0.0.0.0:8080"
/// cache_max_age_secs = 60
///
/// [providers]
/// weather_base_url = "https://api.open-meteo.com"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    pub cache_max_age_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub providers: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            providers: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path, or defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

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
        let dirs = ProjectDirs::from("dev", "geoweather", "geoweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        ensure!(self.request_timeout_secs > 0, "request_timeout_secs must be greater than zero");
        ensure!(!self.user_agent.trim().is_empty(), "user_agent must not be empty");
        HeaderValue::from_str(&self.user_agent)
            .with_context(|| format!("user_agent is not a valid header value: {:?}", self.user_agent))?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind_addr))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `public, max-age=<N>`, attached to successful summaries.
    pub fn cache_control_value(&self) -> HeaderValue {
        // Only ASCII digits are interpolated, so this is always a valid header value.
        HeaderValue::from_str(&format!("public, max-age={}", self.cache_max_age_secs))
            .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=60"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_providers() {
        let cfg = Config::default();

        assert_eq!(cfg.providers.weather_base_url, "https://api.open-meteo.com");
        assert_eq!(cfg.providers.location_base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(cfg.user_agent, "WeatherApp");
        assert_eq!(cfg.cache_control_value(), "public, max-age=60");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "cache_max_age_secs = 120\n[providers]\nweather_base_url = \"http://localhost:9000\"\n")
            .unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.cache_control_value(), "public, max-age=120");
        assert_eq!(cfg.providers.weather_base_url, "http://localhost:9000");
        assert_eq!(cfg.providers.location_base_url, DEFAULT_LOCATION_BASE_URL);
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            bind_addr: "0.0.0.0:8080".into(),
            request_timeout_secs: 3,
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "request_timeout_secs = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("request_timeout_secs"));
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let cfg = Config { bind_addr: "not-an-addr".into(), ..Config::default() };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid bind address"));
    }
}
