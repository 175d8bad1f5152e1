pub mod types;
pub mod sources {
    pub mod gemini;
    pub mod offline;
}
pub mod fixtures;

pub use types::*;
pub use sources::gemini::{GeminiClient, INSIGHT_FAILED, INSIGHT_UNAVAILABLE};
pub use sources::offline::OfflineIntel;

use std::sync::Arc;
use tracing::info;

/// Pick the intel source for the given credential
///
/// A missing or blank key, or a client that cannot be built, yields
/// [`OfflineIntel`] so callers always get a fail-soft source.
pub fn intel_for(
    api_key: Option<&str>,
    base_url: &str,
    model: &str,
    timeout_secs: u64,
) -> Arc<dyn MarketIntel> {
    match api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => match GeminiClient::with_base_url(base_url, key, model, timeout_secs) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::warn!("Gemini client unavailable ({}), using offline intel", e);
                Arc::new(OfflineIntel::new())
            }
        },
        None => {
            info!("No API key configured, using offline intel");
            Arc::new(OfflineIntel::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intel_for_without_key_is_offline() {
        let intel = intel_for(None, sources::gemini::DEFAULT_BASE_URL, "m", 5);
        assert_eq!(intel.name(), "offline");

        let blank = intel_for(Some("   "), sources::gemini::DEFAULT_BASE_URL, "m", 5);
        assert_eq!(blank.name(), "offline");
    }

    #[test]
    fn test_intel_for_with_key_is_gemini() {
        let intel = intel_for(Some("key"), "http://localhost:9999", "m", 5);
        assert_eq!(intel.name(), "gemini");
    }

    #[test]
    fn test_intel_for_bad_base_url_is_offline() {
        let intel = intel_for(Some("key"), "not a url", "m", 5);
        assert_eq!(intel.name(), "offline");
    }
}
