//! In-memory stand-in for a Redis deployment.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis_manager::connection::{
    Connection, DatabaseHandle, Endpoint, InfoGroup, Key, ServerHandle,
};
use redis_manager::error::{RedisManagerError, Result};

#[derive(Clone)]
pub struct FakeServer {
    pub endpoint: Endpoint,
    pub keys: Vec<Key>,
    pub config: Vec<(String, String)>,
    pub info: Vec<InfoGroup>,
    pub replication: Vec<InfoGroup>,
    pub unreachable: bool,
    pub delay: Option<Duration>,
}

impl FakeServer {
    pub fn new(address: &str) -> Self {
        Self {
            endpoint: Endpoint::new(address),
            keys: Vec::new(),
            config: Vec::new(),
            info: Vec::new(),
            replication: Vec::new(),
            unreachable: false,
            delay: None,
        }
    }

    pub fn with_keys(mut self, keys: &[&str]) -> Self {
        self.keys = keys.iter().map(|k| Key::from(*k)).collect();
        self
    }

    pub fn with_raw_keys(mut self, keys: &[&[u8]]) -> Self {
        self.keys = keys.iter().map(|k| Key::from(*k)).collect();
        self
    }

    pub fn with_config(mut self, pairs: &[(&str, &str)]) -> Self {
        self.config = pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn with_info(mut self, groups: Vec<InfoGroup>) -> Self {
        self.info = groups;
        self
    }

    pub fn with_replication(mut self, fields: &[(&str, &str)]) -> Self {
        self.replication = vec![InfoGroup::new("Replication", fields.iter().copied())];
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Every query waits this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn respond(&self) -> redis::RedisResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unreachable {
            return Err(redis::RedisError::from(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ServerHandle for FakeServer {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn keys(&self) -> redis::RedisResult<Vec<Key>> {
        self.respond().await?;
        Ok(self.keys.clone())
    }

    async fn config_get(&self) -> redis::RedisResult<Vec<(String, String)>> {
        self.respond().await?;
        Ok(self.config.clone())
    }

    async fn info(&self, section: Option<&str>) -> redis::RedisResult<Vec<InfoGroup>> {
        self.respond().await?;
        match section {
            Some(s) if s.eq_ignore_ascii_case("replication") => Ok(self.replication.clone()),
            Some(s) => Ok(self
                .info
                .iter()
                .filter(|g| g.section.eq_ignore_ascii_case(s))
                .cloned()
                .collect()),
            None => Ok(self.info.clone()),
        }
    }
}

pub struct FakeDatabase {
    endpoint: Endpoint,
    values: HashMap<Vec<u8>, Vec<u8>>,
}

#[async_trait]
impl DatabaseHandle for FakeDatabase {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn get(&self, key: &[u8]) -> redis::RedisResult<Option<Vec<u8>>> {
        Ok(self.values.get(key).cloned())
    }
}

pub struct FakeConnection {
    servers: Vec<Arc<FakeServer>>,
    database: Arc<FakeDatabase>,
    status: String,
}

impl FakeConnection {
    pub fn new(servers: Vec<FakeServer>) -> Self {
        Self {
            servers: servers.into_iter().map(Arc::new).collect(),
            database: Arc::new(FakeDatabase {
                endpoint: Endpoint::new("db:6379"),
                values: HashMap::new(),
            }),
            status: String::new(),
        }
    }

    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.with_raw_value(key.as_bytes(), value.as_bytes())
    }

    pub fn with_raw_value(mut self, key: &[u8], value: &[u8]) -> Self {
        let mut values = self.database.values.clone();
        values.insert(key.to_vec(), value.to_vec());
        self.database = Arc::new(FakeDatabase {
            endpoint: self.database.endpoint.clone(),
            values,
        });
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }
}

#[async_trait]
impl Connection for FakeConnection {
    fn endpoints(&self) -> Vec<Endpoint> {
        self.servers
            .iter()
            .map(|s| s.endpoint.clone())
            .collect()
    }

    fn server(&self, endpoint: &Endpoint) -> Result<Arc<dyn ServerHandle>> {
        match self
            .servers
            .iter()
            .find(|s| &s.endpoint == endpoint)
        {
            Some(server) => Ok(server.clone()),
            None => Err(RedisManagerError::unknown_endpoint(endpoint)),
        }
    }

    fn database(&self) -> Result<Arc<dyn DatabaseHandle>> {
        Ok(self.database.clone())
    }

    async fn status(&self) -> String {
        self.status.clone()
    }
}
