//! [`Connection`] implementation backed by one `redis::aio::ConnectionManager`
//! per endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;

use crate::connection::{Connection, DatabaseHandle, Endpoint, InfoGroup, Key, ServerHandle};
use crate::error::{RedisManagerError, Result};

#[derive(Clone)]
pub struct RedisEndpoint {
    pub endpoint: Endpoint,
    pub url_redacted: String,
    pub conn: ConnectionManager,
}

#[derive(Clone)]
pub struct RedisMultiplexer {
    endpoints: Arc<Vec<Arc<RedisServer>>>,
}

pub struct RedisServer {
    endpoint: Endpoint,
    url_redacted: String,
    conn: ConnectionManager,
    scan_count: u32,
}

impl RedisMultiplexer {
    pub fn new(endpoints: Vec<RedisEndpoint>, scan_count: u32) -> Self {
        let endpoints = endpoints
            .into_iter()
            .map(|e| {
                Arc::new(RedisServer {
                    endpoint: e.endpoint,
                    url_redacted: e.url_redacted,
                    conn: e.conn,
                    scan_count,
                })
            })
            .collect();
        Self {
            endpoints: Arc::new(endpoints),
        }
    }

    fn find(&self, endpoint: &Endpoint) -> Option<&Arc<RedisServer>> {
        self.endpoints.iter().find(|s| &s.endpoint == endpoint)
    }
}

#[async_trait]
impl Connection for RedisMultiplexer {
    fn endpoints(&self) -> Vec<Endpoint> {
        self.endpoints.iter().map(|s| s.endpoint.clone()).collect()
    }

    fn server(&self, endpoint: &Endpoint) -> Result<Arc<dyn ServerHandle>> {
        match self.find(endpoint) {
            Some(server) => Ok(server.clone()),
            None => Err(RedisManagerError::unknown_endpoint(endpoint)),
        }
    }

    fn database(&self) -> Result<Arc<dyn DatabaseHandle>> {
        match self.endpoints.first() {
            Some(server) => Ok(server.clone()),
            None => Err(RedisManagerError::NoEndpoints),
        }
    }

    async fn status(&self) -> String {
        let mut lines = vec![format!("{} endpoint(s) configured", self.endpoints.len())];
        for server in self.endpoints.iter() {
            let mut conn = server.conn.clone();
            let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
            let state = match pong {
                Ok(_) => "connected".to_string(),
                Err(e) => format!("unreachable ({})", e),
            };
            lines.push(format!("{} ({}): {}", server.endpoint, server.url_redacted, state));
        }
        lines.join("\n")
    }
}

#[async_trait]
impl ServerHandle for RedisServer {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn keys(&self) -> redis::RedisResult<Vec<Key>> {
        let mut conn = self.conn.clone();
        let mut keys: Vec<Key> = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next_cursor, batch): (u64, Vec<Vec<u8>>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("COUNT")
                .arg(self.scan_count)
                .query_async(&mut conn)
                .await?;

            keys.extend(batch.into_iter().map(Key::from));
            cursor = next_cursor;

            if cursor == 0 {
                break;
            }
        }

        tracing::debug!(endpoint = %self.endpoint, count = keys.len(), "Scanned keys");
        Ok(keys)
    }

    async fn config_get(&self) -> redis::RedisResult<Vec<(String, String)>> {
        let mut conn = self.conn.clone();
        redis::cmd("CONFIG")
            .arg("GET")
            .arg("*")
            .query_async(&mut conn)
            .await
    }

    async fn info(&self, section: Option<&str>) -> redis::RedisResult<Vec<InfoGroup>> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("INFO");
        if let Some(section) = section {
            cmd.arg(section);
        }
        let text: String = cmd.query_async(&mut conn).await?;
        Ok(group_info(&text))
    }
}

#[async_trait]
impl DatabaseHandle for RedisServer {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn get(&self, key: &[u8]) -> redis::RedisResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        redis::cmd("GET").arg(key).query_async(&mut conn).await
    }
}

/// Split raw INFO text into its `# Section` groups.
///
/// Lines before the first header are grouped under an empty section name.
/// Lines without a `:` separator are skipped.
pub fn group_info(text: &str) -> Vec<InfoGroup> {
    let mut groups: Vec<InfoGroup> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('#') {
            groups.push(InfoGroup {
                section: header.trim().to_string(),
                fields: Vec::new(),
            });
            continue;
        }
        if let Some((field, value)) = line.split_once(':') {
            if groups.is_empty() {
                groups.push(InfoGroup {
                    section: String::new(),
                    fields: Vec::new(),
                });
            }
            if let Some(group) = groups.last_mut() {
                group.fields.push((field.to_string(), value.to_string()));
            }
        }
    }

    groups
}
