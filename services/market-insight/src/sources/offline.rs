//! Stand-in intel source used when no API credential is configured

use crate::sources::gemini::INSIGHT_UNAVAILABLE;
use crate::types::*;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineIntel;

impl OfflineIntel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl MarketIntel for OfflineIntel {
    async fn fetch_news(&self) -> Vec<NewsItem> {
        debug!("Offline intel: no news source configured");
        Vec::new()
    }

    async fn get_insight(&self, _market_summary: &str) -> String {
        INSIGHT_UNAVAILABLE.to_string()
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_is_fail_soft() {
        let intel = OfflineIntel::new();
        assert!(tokio_test::block_on(intel.fetch_news()).is_empty());
        assert_eq!(
            tokio_test::block_on(intel.get_insight("BTC/USD: 64200")),
            INSIGHT_UNAVAILABLE
        );
        assert_eq!(intel.name(), "offline");
    }
}
