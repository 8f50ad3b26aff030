// src/api/client.rs
//! Thin HTTP client wrapper for WMS GetMap requests.
//!
//! This module wraps reqwest for fetching tile bytes. It knows nothing
//! about images or overlays; decoding happens in the worker.

use crate::error::AppError;
use reqwest::{header, Client};
use url::Url;

/// A thin wrapper around reqwest Client for tile requests.
#[derive(Clone)]
pub struct WmsHttpClient {
    client: Client,
}

impl WmsHttpClient {
    /// Creates a new HTTP client that identifies itself to tile servers.
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .build()
            .map_err(|e| AppError::InternalError {
                message: "Failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing reqwest client, keeping its settings.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("wms_animator/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("image/png, image/jpeg, image/gif, */*;q=0.5"),
        );
        headers
    }
}

#[async_trait::async_trait]
impl super::TileSource for WmsHttpClient {
    async fn fetch_tile(&self, url: &Url) -> Result<Vec<u8>, AppError> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_failure(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Tile request {} failed with {}", url, status);
            return Err(AppError::FetchFailed {
                url: url.to_string(),
                status: Some(status.as_u16()),
                reason: format!("server responded with {}", status),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_failure(url, &e))?;
        log::debug!("Received {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}

fn fetch_failure(url: &Url, err: &reqwest::Error) -> AppError {
    AppError::FetchFailed {
        url: url.to_string(),
        status: err.status().map(|s| s.as_u16()),
        reason: err.to_string(),
    }
}
