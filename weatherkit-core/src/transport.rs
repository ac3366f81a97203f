use async_trait::async_trait;
use reqwest::{Client as HttpClient, Url, header::AUTHORIZATION};
use std::{fmt::Debug, time::Duration};

use crate::error::{Result, WeatherKitError};

/// Upper bound on a response body we are willing to buffer.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Performs a single authenticated GET; no retries.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &Url, bearer_token: &str) -> Result<RawResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: HttpClient,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(WeatherKitError::HttpClientBuild)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url, bearer_token: &str) -> Result<RawResponse> {
        let transport_err = |source| WeatherKitError::Transport {
            method: "GET",
            url: url.to_string(),
            source,
        };
        let too_large = || WeatherKitError::BodyTooLarge {
            method: "GET",
            url: url.to_string(),
            limit: MAX_BODY_BYTES,
        };

        let mut res = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, format!("Bearer {bearer_token}"))
            .send()
            .await
            .map_err(transport_err)?;

        let status = res.status().as_u16();
        let declared = res.content_length();
        if declared.is_some_and(|len| len > MAX_BODY_BYTES as u64) {
            return Err(too_large());
        }

        // Chunked bodies carry no length up front, so the cap is enforced per chunk.
        let mut bytes = Vec::with_capacity(declared.map_or(0, |len| len as usize));
        while let Some(chunk) = res.chunk().await.map_err(transport_err)? {
            if bytes.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(RawResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
