//! Visual CMS content client
//!
//! The enabled flag is a `watch` channel so workbenches composed after a
//! toggle see the new value without remounting.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Models backing the admin layout slots
pub const SLOT_MODELS: [&str; 4] = ["admin-header", "admin-sidebar", "admin-metrics", "admin-footer"];

#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: String,
    pub space: String,
    pub cache_ttl: Duration,
    pub timeout: Duration,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            api_key: String::new(),
            space: String::new(),
            cache_ttl: Duration::from_secs(5 * 60),
            timeout: Duration::from_secs(10),
        }
    }
}

impl CmsConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty()
    }

    /// Enabled only with an API key to authenticate with
    pub fn is_usable(&self) -> bool {
        self.enabled && self.has_credentials()
    }
}

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("CMS request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("CMS returned {status} for model {model}")]
    Status { status: u16, model: String },
}

struct CachedContent {
    value: Value,
    fetched_at: Instant,
}

pub struct CmsClient {
    client: Client,
    config: CmsConfig,
    enabled: watch::Sender<bool>,
    cache: DashMap<String, CachedContent>,
}

impl CmsClient {
    pub fn new(config: CmsConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let (enabled, _) = watch::channel(config.is_usable());
        Ok(Self {
            client,
            config,
            enabled,
            cache: DashMap::new(),
        })
    }

    /// Receiver handed to every mounted workbench
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.enabled.subscribe()
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.borrow()
    }

    /// Whether the CMS could be enabled at runtime
    pub fn is_configured(&self) -> bool {
        self.config.has_credentials()
    }

    /// Flip the flag at runtime. Cached content is dropped on every change.
    pub fn set_enabled(&self, enabled: bool) {
        let previous = self.enabled.send_replace(enabled);
        if previous != enabled {
            self.cache.clear();
            info!(enabled, "CMS content toggled");
        }
    }

    /// Content for `model`, `None` when the CMS is disabled
    pub async fn content(&self, model: &str) -> Result<Option<Value>, CmsError> {
        if !self.is_enabled() {
            return Ok(None);
        }

        if let Some(cached) = self.cache.get(model) {
            if cached.fetched_at.elapsed() < self.config.cache_ttl {
                debug!(model, "CMS cache hit");
                return Ok(Some(cached.value.clone()));
            }
        }

        let value = self.fetch(model).await.inspect_err(|e| {
            warn!(model, error = %e, "CMS content fetch failed");
        })?;

        self.cache.insert(
            model.to_string(),
            CachedContent {
                value: value.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(Some(value))
    }

    async fn fetch(&self, model: &str) -> Result<Value, CmsError> {
        let url = format!("{}/content", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[("model", model), ("space", self.config.space.as_str())])
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CmsError::Status {
                status: response.status().as_u16(),
                model: model.to_string(),
            });
        }
        Ok(response.json::<Value>().await?)
    }
}
