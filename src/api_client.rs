use anyhow::Result;
use reqwest::Url;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::models::{
    record_array, AnalyticsSnapshot, ChatMessage, DocumentInit, DocumentSnapshot, EditRecord,
};

/// Everything a backend call can come back with, normalized.
///
/// `Network` is a transport-level failure with no interpretable response
/// (connection refused, timeout, DNS). `Status` means the server answered
/// with an HTTP status >= 400; the body is ignored. `Parse` means the
/// server answered 2xx/3xx but the non-empty body was not valid JSON.
/// None of these poison the client; the next call starts fresh.
#[derive(Debug, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Client for the three backend services of the document-editing stack.
///
/// Base addresses are fixed at construction. Every operation issues exactly
/// one request and resolves exactly once; concurrent calls may complete in
/// any order, and nothing here serializes overlapping polls.
#[derive(Clone)]
pub struct ApiClient {
    text_api_base: Url,
    chat_api_base: Url,
    analytics_api_base: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            text_api_base: Url::parse(&config.text_api_url)?,
            chat_api_base: Url::parse(&config.chat_api_url)?,
            analytics_api_base: Url::parse(&config.analytics_api_url)?,
            client: reqwest::Client::new(),
        })
    }

    pub fn text_api_base(&self) -> &Url {
        &self.text_api_base
    }

    pub fn chat_api_base(&self) -> &Url {
        &self.chat_api_base
    }

    pub fn analytics_api_base(&self) -> &Url {
        &self.analytics_api_base
    }

    /// Create a new document with the given topic and starting text.
    pub async fn init_document(&self, topic: &str, initial_text: &str) -> ApiResult<DocumentInit> {
        let payload = serde_json::json!({
            "topic": topic,
            "initial_text": initial_text,
        });
        let url = make_url(&self.text_api_base, "/api/document/init", &[]);
        let doc = self.perform_post(url, payload).await?;
        Ok(DocumentInit::from_value(&doc))
    }

    /// Fetch the current document. An empty `document_id` asks the backend
    /// for whatever document it considers current.
    pub async fn fetch_document(&self, document_id: &str) -> ApiResult<DocumentSnapshot> {
        let mut query = Vec::new();
        if !document_id.is_empty() {
            query.push(("document_id", document_id.to_string()));
        }
        let url = make_url(&self.text_api_base, "/api/document/current", &query);
        let doc = self.perform_get(url).await?;
        Ok(DocumentSnapshot::from_value(&doc))
    }

    /// List edit history. `offset` is clamped to >= 0 and `limit` to >= 1
    /// before the request goes out.
    pub async fn fetch_edits(
        &self,
        document_id: &str,
        offset: i64,
        limit: i64,
    ) -> ApiResult<Vec<EditRecord>> {
        let (offset, limit) = clamped_cursor(offset, limit);
        let mut query = vec![
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        if !document_id.is_empty() {
            query.push(("document_id", document_id.to_string()));
        }
        let url = make_url(&self.text_api_base, "/api/edits", &query);
        let doc = self.perform_get(url).await?;
        Ok(record_array(&doc, EditRecord::from_value))
    }

    /// List chat messages, optionally only those after the `since` timestamp.
    pub async fn fetch_chat_messages(
        &self,
        document_id: &str,
        since: &str,
        limit: i64,
    ) -> ApiResult<Vec<ChatMessage>> {
        let mut query = vec![("limit", limit.max(1).to_string())];
        if !document_id.is_empty() {
            query.push(("document_id", document_id.to_string()));
        }
        if !since.is_empty() {
            query.push(("since", since.to_string()));
        }
        let url = make_url(&self.chat_api_base, "/api/chat/messages", &query);
        let doc = self.perform_get(url).await?;
        Ok(record_array(&doc, ChatMessage::from_value))
    }

    /// Fetch aggregate metrics for a period such as "1h", "24h" or "7d".
    /// The period is passed through as-is; the analytics service owns the
    /// set of valid values.
    pub async fn fetch_analytics(&self, period: &str) -> ApiResult<AnalyticsSnapshot> {
        let query = [("period", period.to_string())];
        let url = make_url(&self.analytics_api_base, "/api/analytics/metrics", &query);
        let doc = self.perform_get(url).await?;
        Ok(AnalyticsSnapshot::from_value(&doc))
    }

    async fn perform_get(&self, url: Url) -> ApiResult<Value> {
        debug!(target: "api", "GET {}", url);
        let outcome = normalize_response(self.client.get(url.clone()).send().await).await;
        if let Err(err) = &outcome {
            warn!(target: "api", "GET {} failed: {}", url, err);
        }
        outcome
    }

    async fn perform_post(&self, url: Url, payload: Value) -> ApiResult<Value> {
        debug!(target: "api", "POST {}", url);
        let outcome =
            normalize_response(self.client.post(url.clone()).json(&payload).send().await).await;
        if let Err(err) = &outcome {
            warn!(target: "api", "POST {} failed: {}", url, err);
        }
        outcome
    }
}

/// Classify a finished request into the uniform outcome shape, in
/// precedence order: transport failure, then HTTP status >= 400, then a
/// body that is not JSON. An empty body on a good status is a success
/// with a null payload, which the record constructors turn into defaults.
async fn normalize_response(
    result: std::result::Result<reqwest::Response, reqwest::Error>,
) -> ApiResult<Value> {
    let response = result.map_err(|err| ApiError::Network(err.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    if status >= 400 {
        return Err(ApiError::Status(status));
    }
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(|err| ApiError::Parse(err.to_string()))
}

fn make_url(base: &Url, path: &str, query: &[(&str, String)]) -> Url {
    let mut url = base.clone();
    url.set_path(path);
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    url
}

fn clamped_cursor(offset: i64, limit: i64) -> (i64, i64) {
    (offset.max(0), limit.max(1))
}
