//! Reasoning-oracle API client
//!
//! Submits a validation prompt to a chat-completions style endpoint and
//! returns the raw reply text. The reply is treated as opaque here; shape
//! normalization happens downstream. One client is constructed at process
//! start and shared across requests as a plain injected dependency.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::services::prompts::SYSTEM_PROMPT;

const DEFAULT_ORACLE_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_ORACLE_MODEL: &str = "gpt-4o";
const USER_AGENT: &str = "CableCheck/0.1.0 (cablecheck-dv)";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const RATE_LIMIT_MS: u64 = 500; // 2 requests per second

/// Oracle client errors
///
/// All variants surface to the caller as "oracle unavailable" — the one
/// genuinely retryable condition in the pipeline.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid API key")]
    InvalidApiKey,
}

/// Chat-completions reply envelope (only the parts we read)
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// The oracle collaborator boundary.
///
/// A long-lived handle injected into app state at startup; implementations
/// hold no per-request mutable state.
#[async_trait]
pub trait OracleApi: Send + Sync {
    /// Submit an instruction prompt, receive the raw reply text
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}

/// Rate limiter for the oracle endpoint (2 req/sec)
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Oracle rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Production oracle client over HTTP
pub struct OracleClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OracleClient {
    pub fn new(endpoint: String, model: String, api_key: String) -> Result<Self, OracleError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| OracleError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            endpoint,
            model,
            api_key,
        })
    }

    /// Compiled default endpoint, used when configuration names none
    pub fn default_endpoint() -> &'static str {
        DEFAULT_ORACLE_ENDPOINT
    }

    /// Compiled default model name
    pub fn default_model() -> &'static str {
        DEFAULT_ORACLE_MODEL
    }
}

#[async_trait]
impl OracleApi for OracleClient {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        // Rate limit
        self.rate_limiter.wait().await;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
        });

        tracing::debug!(model = %self.model, "Querying reasoning oracle");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(OracleError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OracleError::ApiError(status.as_u16(), error_text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| OracleError::ParseError(e.to_string()))?;

        // An empty completion degrades downstream like any unparseable reply
        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        tracing::debug!(reply_bytes = content.len(), "Oracle reply received");

        Ok(content)
    }
}
