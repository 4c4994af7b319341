//! Order summarization through a hosted language model
//!
//! One completion request per call: the order text is cut to a character
//! budget, wrapped in a fixed prompt, sent upstream, and the reply is cleaned
//! of `<think>` reasoning spans and `**bold**` markdown before it is shown.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use eo_data::config::LlmConfig;

use crate::render::html_escape;

/// Rough characters-per-token ratio used to size the text budget.
pub const CHARS_PER_TOKEN: usize = 4;

/// Appended to the prompt text when it was cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Appended to the summary when the prompt text was cut.
pub const TRUNCATION_NOTICE: &str = "\n\n<small class='text-muted'>Note: This summary is based on a portion of the full text due to length constraints.</small>";

const PROMPT_PREFIX: &str = "Your goal is to summarize the following executive order in a professional manner, with a focus on the key points and objectives.:\n\n";

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub max_tokens: usize,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("language model is not configured: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("response error: {0}")]
    Response(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Chat-completion backend used by the summarizer.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// OpenAI-compatible chat completion client (Groq by default).
pub struct HttpLlmClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpLlmClient {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Config("no API key (set GROQ_API_KEY)".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| LlmError::Http(e.to_string()))?,
        );

        let body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Response(format!("HTTP {}: {}", status, text)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Serialization(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Response("missing message content".to_string()))
    }
}

/// Produces formatted summaries of order text.
#[derive(Clone)]
pub struct Summarizer {
    client: Arc<dyn LlmClient>,
    model: String,
    max_tokens: usize,
}

impl Summarizer {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, max_tokens: usize) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
        }
    }

    /// Build a summarizer backed by the HTTP client described in `config`.
    pub fn from_config(config: &LlmConfig, timeout: Duration) -> Result<Self, LlmError> {
        let client = HttpLlmClient::new(&config.endpoint, config.api_key.clone(), timeout)?;
        Ok(Self::new(Arc::new(client), &config.model, config.max_tokens))
    }

    /// Character budget for the prompt text.
    pub fn char_limit(&self) -> usize {
        self.max_tokens * CHARS_PER_TOKEN
    }

    /// Summarize `text` with one completion request and format the reply.
    pub async fn summarize(&self, text: &str) -> Result<String, LlmError> {
        let (text, was_truncated) = truncate_text(text, self.char_limit());
        if was_truncated {
            info!(limit = self.char_limit(), "order text truncated for summarization");
        }

        let request = CompletionRequest {
            prompt: build_prompt(&text),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
        };
        let raw = self.client.complete(request).await?;
        debug!(chars = raw.len(), "received summary");

        // Model text is escaped; only markup added here reaches the page
        let mut cleaned = html_escape(strip_thinking(&raw).trim());
        if was_truncated {
            cleaned.push_str(TRUNCATION_NOTICE);
        }

        Ok(format_summary(&cleaned))
    }
}

pub fn build_prompt(text: &str) -> String {
    format!("{}{}", PROMPT_PREFIX, text)
}

/// Cut `text` to `char_limit` characters plus a marker.
///
/// Returns the (possibly cut) text and whether it was cut. Counts Unicode
/// scalar values, not tokens.
pub fn truncate_text(text: &str, char_limit: usize) -> (String, bool) {
    match text.char_indices().nth(char_limit) {
        Some((cut, _)) => (format!("{}{}", &text[..cut], TRUNCATION_MARKER), true),
        None => (text.to_string(), false),
    }
}

fn think_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think pattern"))
}

fn bold_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"))
}

/// Remove every `<think>...</think>` span, including ones spanning lines.
pub fn strip_thinking(text: &str) -> String {
    think_regex().replace_all(text, "").into_owned()
}

/// Turn each `**text**` pair into `<strong>text</strong>`, left to right.
pub fn format_summary(summary: &str) -> String {
    bold_regex()
        .replace_all(summary, "<strong>$1</strong>")
        .into_owned()
}
