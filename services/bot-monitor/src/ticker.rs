//! Status message templates for monitor ticks

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::BotConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTemplate {
    MonitorPair,
    CheckSpread,
    RsiSignal,
    Sentiment,
}

impl StatusTemplate {
    pub const ALL: [StatusTemplate; 4] = [
        StatusTemplate::MonitorPair,
        StatusTemplate::CheckSpread,
        StatusTemplate::RsiSignal,
        StatusTemplate::Sentiment,
    ];

    pub fn needs_venue(&self) -> bool {
        matches!(self, StatusTemplate::CheckSpread)
    }

    /// Templates usable with this config
    pub fn eligible(config: &BotConfig) -> Vec<StatusTemplate> {
        let has_venue = !config.target_venues.is_empty();
        Self::ALL
            .into_iter()
            .filter(|t| has_venue || !t.needs_venue())
            .collect()
    }

    /// Render against `config`; `None` if the template needs a venue and there is none
    pub fn render<R: Rng + ?Sized>(&self, config: &BotConfig, rng: &mut R) -> Option<String> {
        let message = match self {
            StatusTemplate::MonitorPair => {
                format!("Monitoring {} | Volatility: 0.14%", config.primary_pair)
            }
            StatusTemplate::CheckSpread => {
                let venue = config.target_venues.choose(rng)?;
                format!("Checking spread at {}", venue)
            }
            StatusTemplate::RsiSignal => "RSI signal at 44.2 - Neutral.".to_string(),
            StatusTemplate::Sentiment => "Sentiment analysis: 72% Bullish.".to_string(),
        };
        Some(message)
    }
}

/// Compose one status message: uniform over eligible templates, then uniform venue
pub fn compose_status<R: Rng + ?Sized>(config: &BotConfig, rng: &mut R) -> String {
    let eligible = StatusTemplate::eligible(config);
    eligible
        .choose(rng)
        .and_then(|template| template.render(config, rng))
        // MonitorPair never needs a venue, so this only guards an empty template set
        .unwrap_or_else(|| format!("Monitoring {} | Volatility: 0.14%", config.primary_pair))
}
