//! Gemini `generateContent` client for the news feed and market insight

use crate::types::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default API base
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default timeout for generation requests (30 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Returned when the model answers with no text
pub const INSIGHT_UNAVAILABLE: &str = "Analysis unavailable at the moment.";

/// Returned when the insight request fails
pub const INSIGHT_FAILED: &str = "Error processing market analysis.";

const NEWS_PROMPT: &str = "Generate 6 fictional but realistic news items for today: \
    3 about the economy and 3 about politics, focused on the Brazilian and international \
    scene. For each item, provide an Unsplash image URL matching the topic (e.g. photos of \
    financial buildings, congress, currencies, stock exchanges). Return JSON.";

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client against the public API
    pub fn new(api_key: &str, model: &str) -> anyhow::Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with a specific base URL and timeout
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(2)
            .build()?;

        // Url::join drops the last segment unless the base ends with '/'
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;

        info!("Gemini client initialized: url={}, model={}", base_url, model);

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> Result<Url> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        Ok(self.base_url.join(&path)?)
    }

    /// Run one generation and return the concatenated text parts
    async fn generate(&self, prompt: &str, response_schema: Option<Value>) -> Result<String> {
        let url = self.endpoint()?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: response_schema.map(|schema| GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            }),
        };

        debug!("Requesting generation from {}", url);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = serde_json::from_str(&response.text().await?)?;
        // No candidates is an empty answer, not a failure
        let Some(candidate) = body.candidates.into_iter().next() else {
            debug!("Generation returned no candidates");
            return Ok(String::new());
        };

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default())
    }

    /// Fetch generated news, surfacing errors
    ///
    /// Items that do not match the `NewsItem` shape are skipped.
    pub async fn try_fetch_news(&self) -> Result<Vec<NewsItem>> {
        let text = self.generate(NEWS_PROMPT, Some(news_schema())).await?;
        let text = if text.trim().is_empty() { "[]" } else { text.as_str() };

        let raw: Vec<Value> = serde_json::from_str(text)?;
        let total = raw.len();
        let items: Vec<NewsItem> = raw
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<NewsItem>(v) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping malformed news item: {}", e);
                    None
                }
            })
            .collect();

        info!("Fetched {} news items ({} returned)", items.len(), total);
        Ok(items)
    }

    /// Ask for a two-sentence insight, surfacing errors
    ///
    /// An empty answer maps to [`INSIGHT_UNAVAILABLE`].
    pub async fn try_get_insight(&self, market_summary: &str) -> Result<String> {
        let prompt = format!(
            "Analyze this market data and give a quick 2-sentence insight for an elite investor: {}",
            market_summary
        );
        let text = self.generate(&prompt, None).await?;
        let text = text.trim();

        if text.is_empty() {
            Ok(INSIGHT_UNAVAILABLE.to_string())
        } else {
            Ok(text.to_string())
        }
    }
}

#[async_trait::async_trait]
impl MarketIntel for GeminiClient {
    async fn fetch_news(&self) -> Vec<NewsItem> {
        match self.try_fetch_news().await {
            Ok(items) => items,
            Err(e) => {
                warn!("News fetch failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn get_insight(&self, market_summary: &str) -> String {
        match self.try_get_insight(market_summary).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Insight request failed: {}", e);
                INSIGHT_FAILED.to_string()
            }
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Response schema for the news batch
fn news_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "title": { "type": "STRING" },
                "summary": { "type": "STRING" },
                "category": { "type": "STRING", "description": "must be 'economy' or 'politics'" },
                "timestamp": { "type": "STRING" },
                "source": { "type": "STRING" },
                "imageUrl": {
                    "type": "STRING",
                    "description": "A valid high-quality Unsplash image URL related to the topic"
                }
            },
            "required": ["id", "title", "summary", "category", "timestamp", "source", "imageUrl"]
        }
    })
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    async fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::with_base_url(&server.uri(), "test-key", "test-model", 5).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_news_parses_items() {
        let server = MockServer::start().await;
        let news = json!([
            {
                "id": "1", "title": "Dólar recua", "summary": "Câmbio fecha em queda.",
                "category": "economy", "timestamp": "10:00", "source": "Valor",
                "imageUrl": "https://images.unsplash.com/a"
            },
            {
                "id": "2", "title": "Congresso vota reforma", "summary": "Sessão extraordinária.",
                "category": "politics", "timestamp": "11:00", "source": "Folha",
                "imageUrl": "https://images.unsplash.com/b"
            }
        ]);
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(text_response(&news.to_string()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let items = client.fetch_news().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, NewsCategory::Economy);
        assert_eq!(items[1].source, "Folha");
    }

    #[tokio::test]
    async fn test_fetch_news_skips_malformed_items() {
        let server = MockServer::start().await;
        let news = json!([
            {
                "id": "1", "title": "ok", "summary": "s", "category": "economy",
                "timestamp": "t", "source": "src", "imageUrl": "u"
            },
            { "id": "2", "title": "no category" }
        ]);
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response(&news.to_string()))
            .mount(&server)
            .await;

        let items = client_for(&server).await.try_fetch_news().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "1");
    }

    #[tokio::test]
    async fn test_fetch_news_empty_text_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response(""))
            .mount(&server)
            .await;

        let items = client_for(&server).await.try_fetch_news().await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_news_fails_soft_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        match client.try_fetch_news().await {
            Err(IntelError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert!(client.fetch_news().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_news_fails_soft_on_non_json_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response("Here are your headlines!"))
            .mount(&server)
            .await;

        assert!(client_for(&server).await.fetch_news().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_insight_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response("  Real under pressure. Hedge USD exposure.\n"))
            .mount(&server)
            .await;

        let insight = client_for(&server).await.get_insight("USD/BRL: 5.48").await;
        assert_eq!(insight, "Real under pressure. Hedge USD exposure.");
    }

    #[tokio::test]
    async fn test_get_insight_empty_text_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [] } }]
            })))
            .mount(&server)
            .await;

        let insight = client_for(&server).await.get_insight("USD/BRL: 5.48").await;
        assert_eq!(insight, INSIGHT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_get_insight_fails_soft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let insight = client_for(&server).await.get_insight("USD/BRL: 5.48").await;
        assert_eq!(insight, INSIGHT_FAILED);
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.try_get_insight("x").await.unwrap(), INSIGHT_UNAVAILABLE);
        assert_eq!(client.get_insight("x").await, INSIGHT_UNAVAILABLE);
        assert!(client.try_fetch_news().await.unwrap().is_empty());
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client =
            GeminiClient::with_base_url("http://proxy:9000/gemini/", "k", "m1", 5).unwrap();
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "http://proxy:9000/gemini/v1beta/models/m1:generateContent"
        );
    }
}
