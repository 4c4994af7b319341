use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use eo_data::config::Config;

use crate::summarizer::Summarizer;
use crate::text_source::RawTextClient;

/// Shared application state accessible by all handlers.
///
/// Holds no mutable data: every request reads the cache directory afresh.
pub struct AppState {
    /// Directory of cached `<id>.json` order files
    cache_dir: PathBuf,
    summarizer: Summarizer,
    raw_text: RawTextClient,
}

impl AppState {
    pub fn new(cache_dir: PathBuf, summarizer: Summarizer, raw_text: RawTextClient) -> Arc<Self> {
        Arc::new(Self {
            cache_dir,
            summarizer,
            raw_text,
        })
    }

    /// Build state with real HTTP clients from loaded configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Arc<Self>> {
        let summarizer = Summarizer::from_config(&config.llm, config.http_timeout())
            .context("failed to build language model client")?;
        let raw_text = RawTextClient::new(config.http_timeout())?;
        Ok(Self::new(config.cache_dir.clone(), summarizer, raw_text))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn raw_text(&self) -> &RawTextClient {
        &self.raw_text
    }
}
