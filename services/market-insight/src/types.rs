use serde::{Deserialize, Serialize};

/// News item rendered by the feed panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: NewsCategory,
    pub timestamp: String, // free-form, as produced by the generator
    pub source: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Economy,
    Politics,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Economy => "economy",
            NewsCategory::Politics => "politics",
        }
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for the text-generation collaborators
#[derive(Debug, thiserror::Error)]
pub enum IntelError {
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Invalid response format: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Result type for text-generation operations
pub type Result<T> = std::result::Result<T, IntelError>;

/// Fail-soft market intelligence: news headlines and a short insight.
///
/// Implementations never surface errors; a failed call yields an empty
/// news list or a fixed fallback sentence.
#[async_trait::async_trait]
pub trait MarketIntel: Send + Sync {
    /// Fetch a batch of news items, empty on any failure
    async fn fetch_news(&self) -> Vec<NewsItem>;

    /// Produce a short insight over a market summary line
    async fn get_insight(&self, market_summary: &str) -> String;

    /// Source name
    fn name(&self) -> &str;
}
