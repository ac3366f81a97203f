use log::{debug, error, info};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::TokenSource;
use crate::config::ConnectionConfig;
use crate::error::{Result, WeatherKitError};
use crate::transport::{RawResponse, ReqwestTransport, Transport};

pub const DEFAULT_HOST: &str = "weatherkit.apple.com";

const METHOD: &str = "GET";

/// How much of an undecodable body is kept in the error message.
const MAX_BODY_IN_ERROR: usize = 2048;

/// Provider statuses that change how a response is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    BadRequest,
    Unauthorized,
    Other(u16),
}

impl From<u16> for ResponseStatus {
    fn from(code: u16) -> Self {
        match code {
            400 => ResponseStatus::BadRequest,
            401 => ResponseStatus::Unauthorized,
            other => ResponseStatus::Other(other),
        }
    }
}

/// Authenticated WeatherKit client. Immutable once built, safe to share.
#[derive(Debug)]
pub struct Client {
    transport: Arc<dyn Transport>,
    tokens: TokenSource,
    base: Url,
    language: String,
    country: String,
}

impl Client {
    /// Build a client over a `reqwest` transport using the configured timeout.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout())?);
        Self::with_transport(config, transport).await
    }

    pub async fn with_transport(
        config: &ConnectionConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let tokens = TokenSource::from_credentials(config.credentials()?).await?;

        Ok(Self {
            transport,
            tokens,
            base: base_url(DEFAULT_HOST)?,
            language: config.language().to_string(),
            country: config.country().to_string(),
        })
    }

    /// Point the client at another host, e.g. a local mock of the API.
    pub fn with_host(mut self, host: &str) -> Result<Self> {
        self.base = base_url(host)?;
        Ok(self)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| WeatherKitError::InvalidHost {
                host: self.base.to_string(),
                reason: "URL cannot carry a path".into(),
            })?
            .clear()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` with a bearer token and decode the JSON body into `T`.
    pub async fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let token = self.tokens.bearer()?;

        debug!("{METHOD} {url}");
        let res = self.transport.get(url, &token).await?;
        self.check_status(url, &res)?;

        serde_json::from_str(&res.body).map_err(|source| {
            error!("{METHOD} {url}: could not parse response body: {source}");
            WeatherKitError::Decode {
                method: METHOD,
                url: url.to_string(),
                body: truncate_body(&res.body),
                source,
            }
        })
    }

    fn check_status(&self, url: &Url, res: &RawResponse) -> Result<()> {
        match ResponseStatus::from(res.status) {
            ResponseStatus::BadRequest => {
                error!(
                    "{METHOD} {url} -> 400: the server is unable to process the request due to an invalid parameter value"
                );
                Err(WeatherKitError::BadRequest {
                    method: METHOD,
                    url: url.to_string(),
                })
            }
            ResponseStatus::Unauthorized => {
                error!(
                    "{METHOD} {url} -> 401: the request isn't authorized or doesn't include the correct authentication information"
                );
                Err(WeatherKitError::Unauthorized {
                    method: METHOD,
                    url: url.to_string(),
                })
            }
            ResponseStatus::Other(code) => {
                info!("{METHOD} {url} -> {code}");
                Ok(())
            }
        }
    }
}

fn base_url(host: &str) -> Result<Url> {
    Url::parse(&format!("https://{host}/")).map_err(|e| WeatherKitError::InvalidHost {
        host: host.to_string(),
        reason: e.to_string(),
    })
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_IN_ERROR) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
