//! Configuration: built-in defaults, then an optional TOML file, then
//! environment overrides.

use crate::client::Client;
use anyhow::Context;
use serde::Deserialize;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::warn;

pub const CONFIG_ENV: &str = "GARDEN_TRACKER_CONFIG";
pub const API_ENV: &str = "GARDEN_TRACKER_API";
pub const LOG_ENV: &str = "GARDEN_TRACKER_LOG";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_game_url")]
    pub game_url: String,
}

fn default_base_url() -> String {
    Client::DEFAULT_API.to_owned()
}

fn default_game_url() -> String {
    "https://www.roblox.com/games/126884695634066/Grow-a-Garden".to_owned()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            game_url: default_game_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_stock_interval")]
    pub stock_interval_secs: u64,

    #[serde(default = "default_weather_interval")]
    pub weather_interval_secs: u64,

    #[serde(default = "default_clock_tick")]
    pub clock_tick_secs: u64,
}

const fn default_stock_interval() -> u64 {
    5
}

const fn default_weather_interval() -> u64 {
    10
}

const fn default_clock_tick() -> u64 {
    1
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            stock_interval_secs: default_stock_interval(),
            weather_interval_secs: default_weather_interval(),
            clock_tick_secs: default_clock_tick(),
        }
    }
}

impl PollingConfig {
    pub const fn stock_interval(&self) -> Duration {
        Duration::from_secs(self.stock_interval_secs)
    }

    pub const fn weather_interval(&self) -> Duration {
        Duration::from_secs(self.weather_interval_secs)
    }

    pub const fn clock_tick(&self) -> Duration {
        Duration::from_secs(self.clock_tick_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_owned()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

const fn default_width() -> u32 {
    1280
}

const fn default_height() -> u32 {
    900
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("garden-tracker").join("config.toml")))
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)
                .with_context(|| format!("invalid config `{}`", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("cannot read `{}`", path.display())),
        }
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Never fails: a broken file is reported back and defaults are used.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        let (config, error) = match Self::default_path() {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => (config, None),
                Err(err) => (Self::default(), Some(err)),
            },
            None => (Self::default(), None),
        };
        (config.with_env(|key| env::var(key).ok()), error)
    }

    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = var(API_ENV) {
            self.api.base_url = base_url;
        }
        if let Some(level) = var(LOG_ENV) {
            self.logging.level = level;
        }
        self
    }

    /// Clamps what cannot work. Call after logging is up, it warns.
    pub fn validated(mut self) -> Self {
        let polling = &mut self.polling;
        for (name, secs) in [
            ("stock_interval_secs", &mut polling.stock_interval_secs),
            ("weather_interval_secs", &mut polling.weather_interval_secs),
            ("clock_tick_secs", &mut polling.clock_tick_secs),
        ] {
            if *secs == 0 {
                warn!("`polling.{name}` must be positive, using 1");
                *secs = 1;
            }
        }

        let trimmed = self.api.base_url.trim_end_matches('/');
        if trimmed.len() != self.api.base_url.len() {
            self.api.base_url = trimmed.to_owned();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, Client::DEFAULT_API);
        assert_eq!(config.polling.stock_interval(), Duration::from_secs(5));
        assert_eq!(config.polling.weather_interval(), Duration::from_secs(10));
        assert_eq!(config.polling.clock_tick(), Duration::from_secs(1));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_file() {
        let config = Config::from_toml(
            r#"
            [polling]
            stock_interval_secs = 3

            [api]
            base_url = "http://localhost:8080/api/"
            "#,
        )
        .unwrap()
        .validated();

        assert_eq!(config.polling.stock_interval_secs, 3);
        assert_eq!(config.polling.weather_interval_secs, 10);
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.game_url, default_game_url());
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn zero_intervals_are_clamped() {
        let config = Config::from_toml("[polling]\nweather_interval_secs = 0\nclock_tick_secs = 0")
            .unwrap()
            .validated();
        assert_eq!(config.polling.weather_interval_secs, 1);
        assert_eq!(config.polling.clock_tick_secs, 1);
        assert_eq!(config.polling.stock_interval_secs, 5);
    }

    #[test]
    fn broken_file_is_an_error() {
        assert!(Config::from_toml("[polling\nstock = ").is_err());
        assert!(Config::from_toml("[polling]\nstock_interval_secs = \"soon\"").is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let config = Config::from_file(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(config.polling.stock_interval_secs, 5);
    }

    #[test]
    fn env_overrides() {
        let config = Config::default().with_env(|key| match key {
            API_ENV => Some("http://mirror.local/api".into()),
            LOG_ENV => Some("debug".into()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "http://mirror.local/api");
        assert_eq!(config.logging.level, "debug");
    }
}
