//! Scripted MarketIntel for console tests without network access

use async_trait::async_trait;
use market_insight::{MarketIntel, NewsCategory, NewsItem};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockIntel {
    pub news: Vec<NewsItem>,
    pub insight: String,
    /// Market summaries received by `get_insight`
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockIntel {
    pub fn with_headline(title: &str) -> Self {
        Self {
            news: vec![NewsItem {
                id: "n-1".to_string(),
                title: title.to_string(),
                summary: "Rates held steady.".to_string(),
                category: NewsCategory::Economy,
                timestamp: "10:00".to_string(),
                source: "Wire".to_string(),
                image_url: "https://picsum.photos/seed/n1/400/200".to_string(),
            }],
            insight: "Real stays range-bound.".to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl MarketIntel for MockIntel {
    async fn fetch_news(&self) -> Vec<NewsItem> {
        self.news.clone()
    }

    async fn get_insight(&self, market_data: &str) -> String {
        self.prompts.lock().unwrap().push(market_data.to_string());
        self.insight.clone()
    }

    fn name(&self) -> &str {
        "mock"
    }
}
