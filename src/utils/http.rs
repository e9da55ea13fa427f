// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Byte-level retrieval of a single URL.
///
/// Fetchers go through this seam so scan loops can be exercised without
/// the network.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` with extra request headers and return the response body.
    ///
    /// Network failures, timeouts and non-2xx statuses are all reported
    /// as [`AppError::Fetch`].
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Vec<u8>>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// [`Fetch`] implementation backed by `reqwest`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Vec<u8>> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::fetch(url, e))?;
        let body = response.bytes().await.map_err(|e| AppError::fetch(url, e))?;
        Ok(body.to_vec())
    }
}
