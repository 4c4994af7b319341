//! Resolve the text to summarize for a cached order

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{error, info};

use eo_data::ExecutiveOrder;

/// Fetches full order text from the registry's raw text URLs.
#[derive(Debug, Clone)]
pub struct RawTextClient {
    client: reqwest::Client,
}

impl RawTextClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build raw text HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` and return the body. Anything but 200 is an error.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await.context("request failed")?;
        let status = response.status();
        if status != StatusCode::OK {
            anyhow::bail!("status {}", status.as_u16());
        }
        response.text().await.context("failed to read body")
    }
}

/// Pick the text to summarize: explanation, then abstract, then the raw text URL.
///
/// Later sources are only consulted when earlier ones are missing or empty.
/// Returns `None` when no source yields text.
pub async fn resolve_summary_text(
    order: &ExecutiveOrder,
    raw_text: &RawTextClient,
) -> Option<String> {
    if let Some(explanation) = order.content_str("explanation") {
        return Some(explanation.to_string());
    }
    if let Some(abstract_text) = order.data_str("abstract") {
        return Some(abstract_text.to_string());
    }

    let url = order.content_str("raw_text_url")?;
    match raw_text.fetch(url).await {
        Ok(body) if !body.is_empty() => {
            info!(url, "fetched raw text");
            Some(body)
        }
        Ok(_) => None,
        Err(e) => {
            error!(url, error = %e, "error fetching raw text");
            None
        }
    }
}
