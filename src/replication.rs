//! Replica topology from a primary's `# Replication` INFO section.
//!
//! A primary reports `connected_slaves:N` followed by `slave0` .. `slave{N-1}`,
//! each a comma separated list of `name=value` pairs:
//!
//! ```text
//! slave0:ip=127.0.0.1,port=6001,state=online,offset=603,lag=1
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{RedisManagerError, Result};
use crate::info::{first_section, InfoReport};

/// INFO section filter used to query replication state.
pub const REPLICATION_SECTION: &str = "REPLICATION";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicaInfo {
    pub ip: String,
    pub port: u16,
    /// Replication state as reported by the primary, e.g. `online`.
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag: Option<i64>,
}

/// Replicas listed in the first section of a replication-filtered report.
///
/// A report without any section yields no replicas.
pub fn replicas_from_report(report: &InfoReport) -> Result<Vec<ReplicaInfo>> {
    match first_section(report) {
        Some(fields) => replicas_from_fields(|name: &str| fields.get(name).map(String::as_str)),
        None => Ok(Vec::new()),
    }
}

/// Reads `connected_slaves` and every `slave{i}` entry through `lookup`.
pub fn replicas_from_fields<'a, F>(lookup: F) -> Result<Vec<ReplicaInfo>>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let raw_count = lookup("connected_slaves").ok_or_else(|| {
        RedisManagerError::MalformedReplicationData("missing connected_slaves".to_string())
    })?;
    let count: usize = raw_count.trim().parse().map_err(|_| {
        RedisManagerError::MalformedReplicationData(format!(
            "connected_slaves is not a number: '{}'",
            raw_count
        ))
    })?;

    (0..count)
        .map(|i| {
            let name = format!("slave{}", i);
            let raw = lookup(&name).ok_or_else(|| {
                RedisManagerError::MalformedReplicationData(format!(
                    "connected_slaves is {} but {} is missing",
                    count, name
                ))
            })?;
            parse_replica(&name, raw)
        })
        .collect()
}

/// Parse one `ip=..,port=..,state=..` descriptor.
pub fn parse_replica(name: &str, raw: &str) -> Result<ReplicaInfo> {
    let descriptor = parse_descriptor(name, raw)?;

    let field = |key: &str| {
        descriptor.get(key).copied().ok_or_else(|| {
            RedisManagerError::MalformedReplicationData(format!("{} has no '{}'", name, key))
        })
    };

    let port = field("port")?;
    let port: u16 = port.trim().parse().map_err(|_| {
        RedisManagerError::MalformedReplicationData(format!("{} has invalid port '{}'", name, port))
    })?;

    Ok(ReplicaInfo {
        ip: field("ip")?.to_string(),
        port,
        state: field("state")?.to_string(),
        offset: descriptor.get("offset").and_then(|v| v.trim().parse().ok()),
        lag: descriptor.get("lag").and_then(|v| v.trim().parse().ok()),
    })
}

fn parse_descriptor<'a>(name: &str, raw: &'a str) -> Result<HashMap<&'a str, &'a str>> {
    raw.trim()
        .split(',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.split_once('=').ok_or_else(|| {
                RedisManagerError::MalformedReplicationData(format!(
                    "{} has token without '=': '{}'",
                    name, token
                ))
            })
        })
        .collect()
}
