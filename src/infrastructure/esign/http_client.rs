//! HTTP adapter for the external signing service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::debug;

use crate::domain::{ESignError, ESignService, SigningSession};

#[derive(Debug, Clone)]
pub struct ESignClientConfig {
    /// Base URL, e.g. `https://esign.example.com/api`
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

pub struct HttpESignClient {
    client: Client,
    config: ESignClientConfig,
}

impl HttpESignClient {
    pub fn new(config: ESignClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// `{base}/sessions/{id}[/suffix]` with the id as a single escaped segment
    fn url(&self, session_id: &str, suffix: Option<&str>) -> Result<Url, ESignError> {
        if matches!(session_id, "" | "." | "..") {
            return Err(ESignError::SessionNotFound(session_id.to_string()));
        }
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ESignError::Unavailable(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ESignError::Unavailable("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .push("sessions")
            .push(session_id)
            .extend(suffix);
        Ok(url)
    }

    /// Map transport failures and non-2xx answers to [`ESignError`]
    async fn check(session_id: &str, result: Result<Response, reqwest::Error>) -> Result<Response, ESignError> {
        let response = result.map_err(|e| ESignError::Unavailable(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ESignError::SessionNotFound(session_id.to_string()));
        }
        let message = response.text().await.unwrap_or_default();
        Err(ESignError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ESignService for HttpESignClient {
    async fn get_signing_status(&self, session_id: &str) -> Result<SigningSession, ESignError> {
        debug!(session_id, "Fetching signing status");
        let result = self
            .client
            .get(self.url(session_id, None)?)
            .bearer_auth(&self.config.api_key)
            .send()
            .await;
        Self::check(session_id, result)
            .await?
            .json::<SigningSession>()
            .await
            .map_err(|e| ESignError::InvalidResponse(e.to_string()))
    }

    async fn download_signed_document(&self, session_id: &str) -> Result<Vec<u8>, ESignError> {
        debug!(session_id, "Downloading signed document");
        let result = self
            .client
            .get(self.url(session_id, Some("document"))?)
            .bearer_auth(&self.config.api_key)
            .send()
            .await;
        let bytes = Self::check(session_id, result)
            .await?
            .bytes()
            .await
            .map_err(|e| ESignError::Unavailable(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn cancel_signing_flow(&self, session_id: &str) -> Result<(), ESignError> {
        debug!(session_id, "Cancelling signing flow");
        let result = self
            .client
            .post(self.url(session_id, Some("cancel"))?)
            .bearer_auth(&self.config.api_key)
            .send()
            .await;
        Self::check(session_id, result).await?;
        Ok(())
    }
}
