use std::sync::Arc;

use crate::connection::{Endpoint, InfoGroup, Key, ServerHandle};
use crate::error::{RedisManagerError, Result};

/// Read-only queries against a single endpoint.
///
/// Errors come back tagged with the endpoint; nothing is retried here.
#[derive(Clone)]
pub struct ServerQuery {
    handle: Arc<dyn ServerHandle>,
}

impl ServerQuery {
    pub fn new(handle: Arc<dyn ServerHandle>) -> Self {
        Self { handle }
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.handle.endpoint()
    }

    pub async fn keys(&self) -> Result<Vec<Key>> {
        tracing::debug!(endpoint = %self.endpoint(), "Listing keys");
        self.handle.keys().await.map_err(|e| self.fail(e))
    }

    pub async fn config(&self) -> Result<Vec<(String, String)>> {
        tracing::debug!(endpoint = %self.endpoint(), "Fetching config");
        self.handle.config_get().await.map_err(|e| self.fail(e))
    }

    pub async fn info(&self, section: Option<&str>) -> Result<Vec<InfoGroup>> {
        tracing::debug!(endpoint = %self.endpoint(), section, "Fetching INFO");
        self.handle.info(section).await.map_err(|e| self.fail(e))
    }

    fn fail(&self, e: redis::RedisError) -> RedisManagerError {
        RedisManagerError::from_redis(self.endpoint(), e)
    }
}
