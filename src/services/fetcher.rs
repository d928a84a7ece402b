// src/services/fetcher.rs

//! Page fetching capability.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::{AppError, Result};
use crate::models::FetchConfig;
use crate::utils::http::{create_client, is_html_content_type};

/// Fetches a source page body.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`DocumentFetcher`] backed by a shared reqwest client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the configured user agent and timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::fetch(url, e))?;

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html_content_type(content_type) {
                return Err(AppError::parse(
                    url,
                    format!("expected an HTML document, got '{content_type}'"),
                ));
            }
        }

        let body = response.text().await.map_err(|e| AppError::fetch(url, e))?;
        log::debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}
