use log::debug;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::client::Client;
use crate::config::ConnectionConfig;
use crate::error::{Result, WeatherKitError};
use crate::transport::Transport;

/// Logical name of the single remote connection modelled per process.
pub const CONNECTION_NAME: &str = "weatherkit";

/// Lazily builds one [`Client`] and hands out shared references to it.
///
/// Concurrent first callers wait on the same initialization; a failed
/// initialization leaves the slot empty so a later call can try again.
#[derive(Debug)]
pub struct ConnectionCache {
    config: ConnectionConfig,
    transport: Option<Arc<dyn Transport>>,
    slot: OnceCell<Arc<Client>>,
}

impl ConnectionCache {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            transport: None,
            slot: OnceCell::new(),
        }
    }

    /// Use `transport` instead of the default `reqwest` one.
    pub fn with_transport(config: ConnectionConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport: Some(transport),
            slot: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.slot.initialized()
    }

    pub async fn client(&self) -> Result<Arc<Client>> {
        self.slot
            .get_or_try_init(|| async {
                debug!("creating client for connection '{CONNECTION_NAME}'");
                let client = match &self.transport {
                    Some(transport) => {
                        Client::with_transport(&self.config, transport.clone()).await?
                    }
                    None => Client::connect(&self.config).await?,
                };
                Ok::<_, WeatherKitError>(Arc::new(client))
            })
            .await
            .map(Arc::clone)
    }
}
