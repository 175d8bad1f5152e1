//! Bot Configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Venues the monitor can be pointed at
pub const AVAILABLE_VENUES: [&str; 6] =
    ["Banco Inter", "Nubank", "BTG Pactual", "XP", "Binance", "Kraken"];

/// Instrument labels offered for the primary pair
pub const PRIMARY_PAIRS: [&str; 4] = ["USD/BRL", "EUR/BRL", "BTC/USD", "ETH/USD"];

/// Bot monitor configuration
///
/// Every field is freely writable; nothing here is validated or enforced.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BotConfig {
    pub name: String,
    pub risk_profile: RiskProfile,
    /// Ordered set, see [`BotConfig::toggle_venue`]
    pub target_venues: Vec<String>,
    /// Not read by the monitor
    pub auto_trade_enabled: bool,
    /// Display only
    pub max_drawdown_percent: f64,
    pub primary_pair: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "2p-Apollo v2.4".to_string(),
            risk_profile: RiskProfile::Moderate,
            target_venues: vec!["Banco Inter".to_string(), "Nubank".to_string()],
            auto_trade_enabled: false,
            max_drawdown_percent: 5.0,
            primary_pair: "USD/BRL".to_string(),
        }
    }
}

impl BotConfig {
    /// Load a YAML preset; missing fields keep their defaults
    pub fn load_preset(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preset: {}", path.display()))?;
        let mut config: BotConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("Invalid preset: {}", path.display()))?;
        config.dedup_venues();
        Ok(config)
    }

    /// Remove `venue` if present, otherwise append it.
    ///
    /// Returns true if the venue is a target after the call.
    pub fn toggle_venue(&mut self, venue: &str) -> bool {
        if let Some(pos) = self.target_venues.iter().position(|v| v == venue) {
            self.target_venues.remove(pos);
            false
        } else {
            self.target_venues.push(venue.to_string());
            true
        }
    }

    pub fn has_venue(&self, venue: &str) -> bool {
        self.target_venues.iter().any(|v| v == venue)
    }

    /// Overwrite one field, no range or content checks
    pub fn apply(&mut self, update: ConfigUpdate) {
        match update {
            ConfigUpdate::Name(name) => self.name = name,
            ConfigUpdate::RiskProfile(profile) => self.risk_profile = profile,
            ConfigUpdate::PrimaryPair(pair) => self.primary_pair = pair,
            ConfigUpdate::MaxDrawdownPercent(pct) => self.max_drawdown_percent = pct,
            ConfigUpdate::AutoTradeEnabled(enabled) => self.auto_trade_enabled = enabled,
        }
    }

    // Presets are hand-written, so keep the set invariant on load
    fn dedup_venues(&mut self) {
        let mut seen = Vec::with_capacity(self.target_venues.len());
        self.target_venues.retain(|v| {
            if seen.contains(v) {
                false
            } else {
                seen.push(v.clone());
                true
            }
        });
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Moderate,
        RiskProfile::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        }
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = ConfigFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskProfile::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigFieldError::InvalidValue {
                field: "risk",
                value: s.to_string(),
            })
    }
}

/// Single-field overwrite of a [`BotConfig`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigUpdate {
    Name(String),
    RiskProfile(RiskProfile),
    PrimaryPair(String),
    MaxDrawdownPercent(f64),
    AutoTradeEnabled(bool),
}

impl ConfigUpdate {
    /// Build an update from a field name and its textual value.
    ///
    /// Only the value's type is checked: any number is a valid drawdown and
    /// any text is a valid name or pair.
    pub fn parse(field: &str, value: &str) -> Result<Self, ConfigFieldError> {
        let invalid = |field: &'static str| ConfigFieldError::InvalidValue {
            field,
            value: value.to_string(),
        };

        match field.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(ConfigUpdate::Name(value.to_string())),
            "risk" | "risk_profile" => Ok(ConfigUpdate::RiskProfile(value.parse()?)),
            "pair" | "primary_pair" => Ok(ConfigUpdate::PrimaryPair(value.trim().to_string())),
            "drawdown" | "max_drawdown_percent" => value
                .trim()
                .parse::<f64>()
                .map(ConfigUpdate::MaxDrawdownPercent)
                .map_err(|_| invalid("drawdown")),
            "auto_trade" | "auto_trade_enabled" => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(ConfigUpdate::AutoTradeEnabled(true)),
                "false" | "off" | "no" | "0" => Ok(ConfigUpdate::AutoTradeEnabled(false)),
                _ => Err(invalid("auto_trade")),
            },
            other => Err(ConfigFieldError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigFieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}
