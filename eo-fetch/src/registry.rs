//! Federal Register API client

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::{error, info};

/// Records requested per page.
pub const PER_PAGE: u32 = 20;

/// A registry record (listing or detail), kept as an opaque JSON object.
pub type Record = Map<String, Value>;

/// Client for the document registry. One instance is shared by a whole fetch run.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build registry HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every executive order signed on or after `start_date`.
    ///
    /// Walks pages until one comes back empty or the fetched total reaches the
    /// registry's reported count. A failed page ends pagination and whatever
    /// was collected so far is returned.
    pub async fn fetch_all_executive_orders(&self, start_date: &str) -> Vec<Record> {
        let mut orders: Vec<Record> = Vec::new();
        let mut page: u32 = 1;
        let url = format!("{}/documents.json", self.base_url);
        info!(start_date, "starting to fetch executive orders");

        loop {
            info!(page, "fetching page");
            let page_value = match self.get_page(&url, start_date, page).await {
                Ok(value) => value,
                Err(e) => {
                    error!(page, error = %e, "failed to fetch page; stopping pagination");
                    break;
                }
            };

            let (results, count) = parse_page(page_value);
            if results.is_empty() {
                info!(page, "no results on page; ending pagination");
                break;
            }

            let page_len = results.len();
            orders.extend(results);
            let total_count = count.unwrap_or(orders.len() as u64);
            info!(
                page,
                page_len,
                fetched = orders.len(),
                total = total_count,
                "fetched page"
            );
            if orders.len() as u64 >= total_count {
                info!(total = orders.len(), "all orders fetched");
                break;
            }

            page += 1;
        }

        orders
    }

    async fn get_page(&self, url: &str, start_date: &str, page: u32) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(&[
                ("conditions[presidential_document_type][]", "executive_order"),
                ("conditions[signing_date][gte]", start_date),
            ])
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .send()
            .await
            .context("request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            anyhow::bail!("received status code {}", status.as_u16());
        }

        response.json::<Value>().await.context("invalid JSON body")
    }

    /// Fetch the detail record for one document. Any failure yields an empty record.
    pub async fn fetch_executive_order_details(&self, document_number: &str) -> Record {
        let url = format!("{}/documents/{}.json", self.base_url, document_number);
        info!(document = document_number, "fetching details");

        match self.get_details(&url).await {
            Ok(details) => details,
            Err(e) => {
                error!(document = document_number, error = %e, "error fetching details");
                Record::new()
            }
        }
    }

    async fn get_details(&self, url: &str) -> Result<Record> {
        let response = self.client.get(url).send().await.context("request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            anyhow::bail!("status {}", status.as_u16());
        }

        let value: Value = response.json().await.context("invalid JSON body")?;
        match value {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("detail response is not a JSON object"),
        }
    }
}

/// Split a listing page into its records and the reported total count.
pub fn parse_page(value: Value) -> (Vec<Record>, Option<u64>) {
    let count = value.get("count").and_then(Value::as_u64);
    let results = match value {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        },
        _ => vec![],
    };
    (results, count)
}
