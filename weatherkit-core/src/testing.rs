//! Offline test doubles shared by the unit tests.

use async_trait::async_trait;
use reqwest::Url;
use std::sync::{Arc, Mutex};

use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::transport::{RawResponse, Transport};

pub(crate) fn static_config() -> ConnectionConfig {
    ConnectionConfig {
        token: Some("static-test-token".into()),
        ..Default::default()
    }
}

/// Replies to every GET with the same canned response and records the calls.
#[derive(Debug)]
pub(crate) struct StubTransport {
    response: RawResponse,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubTransport {
    pub(crate) fn replying(status: u16, body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            response: RawResponse {
                status,
                body: body.into(),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    /// `(url, bearer token)` for each request made so far.
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &Url, bearer_token: &str) -> Result<RawResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), bearer_token.to_string()));
        Ok(self.response.clone())
    }
}
