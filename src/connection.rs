//! The connection abstraction the aggregator fans out over.
//!
//! A [`Connection`] owns every endpoint of one logical Redis deployment and
//! hands out per-endpoint [`ServerHandle`]s plus a keyspace
//! [`DatabaseHandle`]. Timeouts, retries and authentication all live behind
//! these traits.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Address of one Redis node, e.g. `127.0.0.1:6379`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A binary-safe Redis key, kept as the exact bytes the server returned.
///
/// Rendering as text (display, JSON) is lossy for non UTF-8 bytes; queries
/// always use [`Key::as_bytes`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Vec<u8>);

impl Key {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Key {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Key {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for Key {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

/// One INFO section as grouped by the connection: the header name and its
/// `field:value` lines in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoGroup {
    pub section: String,
    pub fields: Vec<(String, String)>,
}

impl InfoGroup {
    pub fn new<S, F, V>(section: S, fields: impl IntoIterator<Item = (F, V)>) -> Self
    where
        S: Into<String>,
        F: Into<String>,
        V: Into<String>,
    {
        Self {
            section: section.into(),
            fields: fields
                .into_iter()
                .map(|(f, v)| (f.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
pub trait Connection: Send + Sync {
    /// Endpoints in the order fan-out results are merged.
    fn endpoints(&self) -> Vec<Endpoint>;

    fn server(&self, endpoint: &Endpoint) -> Result<Arc<dyn ServerHandle>>;

    fn database(&self) -> Result<Arc<dyn DatabaseHandle>>;

    /// Human-readable status of the whole connection.
    async fn status(&self) -> String;
}

#[async_trait]
pub trait ServerHandle: Send + Sync {
    fn endpoint(&self) -> &Endpoint;

    async fn keys(&self) -> redis::RedisResult<Vec<Key>>;

    async fn config_get(&self) -> redis::RedisResult<Vec<(String, String)>>;

    async fn info(&self, section: Option<&str>) -> redis::RedisResult<Vec<InfoGroup>>;
}

#[async_trait]
pub trait DatabaseHandle: Send + Sync {
    fn endpoint(&self) -> &Endpoint;

    async fn get(&self, key: &[u8]) -> redis::RedisResult<Option<Vec<u8>>>;
}
