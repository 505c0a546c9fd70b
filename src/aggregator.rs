//! Fan-out over every endpoint of a [`Connection`].
//!
//! Per-endpoint queries run concurrently but results are always merged in
//! endpoint order. The first failing endpoint aborts the whole operation.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::try_join_all;

use crate::adapter::ServerQuery;
use crate::connection::{Connection, Endpoint, Key};
use crate::error::{RedisManagerError, Result};
use crate::info::{parse_info, InfoReport};
use crate::replication::{replicas_from_report, ReplicaInfo, REPLICATION_SECTION};

#[derive(Clone)]
pub struct Aggregator {
    connection: Arc<dyn Connection>,
}

impl Aggregator {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.connection.endpoints()
    }

    fn servers(&self) -> Result<Vec<ServerQuery>> {
        self.connection
            .endpoints()
            .iter()
            .map(|endpoint| self.connection.server(endpoint).map(ServerQuery::new))
            .collect()
    }

    /// Keys of every endpoint, concatenated. Not deduplicated.
    pub async fn keys(&self) -> Result<Vec<Key>> {
        let servers = self.servers()?;
        let per_endpoint = try_join_all(servers.iter().map(|s| s.keys())).await?;
        Ok(per_endpoint.into_iter().flatten().collect())
    }

    /// Plain `GET` against the keyspace database. A missing key is `Ok(None)`.
    ///
    /// Key and value are raw bytes, so a [`Key`] from [`Aggregator::keys`]
    /// can be passed back as `key.as_bytes()`.
    pub async fn value(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let database = self.connection.database()?;
        database
            .get(key)
            .await
            .map_err(|e| RedisManagerError::from_redis(database.endpoint(), e))
    }

    /// Config of every endpoint merged into one map.
    ///
    /// When two endpoints report the same parameter the later endpoint wins.
    pub async fn config(&self) -> Result<BTreeMap<String, String>> {
        let servers = self.servers()?;
        let per_endpoint = try_join_all(servers.iter().map(|s| s.config())).await?;

        let mut configs = BTreeMap::new();
        for (server, pairs) in servers.iter().zip(per_endpoint) {
            for (name, value) in pairs {
                if let Some(previous) = configs.insert(name.clone(), value) {
                    tracing::debug!(
                        endpoint = %server.endpoint(),
                        name = %name,
                        previous = %previous,
                        "Config parameter overwritten by later endpoint"
                    );
                }
            }
        }
        Ok(configs)
    }

    /// Full INFO of every endpoint; one entry per section per endpoint.
    pub async fn info(&self) -> Result<InfoReport> {
        self.collect_info(None).await
    }

    /// INFO restricted to `section` (e.g. `memory`) on every endpoint.
    pub async fn info_section(&self, section: &str) -> Result<InfoReport> {
        self.collect_info(Some(section)).await
    }

    async fn collect_info(&self, section: Option<&str>) -> Result<InfoReport> {
        let servers = self.servers()?;
        let per_endpoint = try_join_all(servers.iter().map(|s| s.info(section))).await?;
        Ok(per_endpoint.into_iter().flat_map(parse_info).collect())
    }

    /// Replicas reported by every endpoint's replication section.
    pub async fn slaves(&self) -> Result<Vec<ReplicaInfo>> {
        let servers = self.servers()?;
        let per_endpoint = try_join_all(servers.iter().map(|s| async move {
            let groups = s.info(Some(REPLICATION_SECTION)).await?;
            replicas_from_report(&parse_info(groups)).map_err(|e| {
                tracing::warn!(endpoint = %s.endpoint(), error = %e, "Unreadable replication section");
                e
            })
        }))
        .await?;
        Ok(per_endpoint.into_iter().flatten().collect())
    }

    pub async fn status(&self) -> String {
        self.connection.status().await
    }
}
