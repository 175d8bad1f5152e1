//! Runtime settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `monitor.{yaml,toml,json}` in the working directory, then `MONITOR_*`
//! environment variables (`__` separates nested keys, e.g.
//! `MONITOR_INSIGHT__MODEL`).

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::BotConfig;

/// Default preset location under the home directory
const DEFAULT_PRESET_DIR: &str = ".bot-monitor";
const DEFAULT_PRESET_FILE: &str = "bot.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub preset_path: Option<PathBuf>,
    #[serde(default)]
    pub insight: InsightSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsightSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            rng_seed: None,
            preset_path: None,
            insight: InsightSettings::default(),
        }
    }
}

fn default_tick_interval_ms() -> u64 {
    3000
}

fn default_model() -> String {
    market_insight::sources::gemini::DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    market_insight::sources::gemini::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Load from `monitor.*` in the working directory and the environment
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("monitor")
    }

    /// Load with an explicit file stem (extension resolved by `config`)
    pub fn load_from(file_stem: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(
                config::Environment::with_prefix("MONITOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read monitor settings")?;

        let mut settings: Settings = settings
            .try_deserialize()
            .context("Invalid monitor settings")?;

        if settings.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be greater than zero");
        }

        if settings.insight.api_key.is_none() {
            settings.insight.api_key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok();
        }

        Ok(settings)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Explicit preset path, else `~/.bot-monitor/bot.yaml` when it exists
    pub fn resolved_preset_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.preset_path {
            return Some(path.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_PRESET_DIR).join(DEFAULT_PRESET_FILE))
            .filter(|path| path.is_file())
    }

    /// Initial bot config: the preset if one resolves, otherwise defaults
    pub fn initial_bot_config(&self) -> anyhow::Result<BotConfig> {
        match self.resolved_preset_path() {
            Some(path) => {
                tracing::info!("Loading bot preset from {}", path.display());
                BotConfig::load_preset(&path)
            }
            None => Ok(BotConfig::default()),
        }
    }
}
