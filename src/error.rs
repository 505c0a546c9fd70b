use rmcp::model::ErrorData;

use crate::connection::Endpoint;

#[derive(Debug, thiserror::Error)]
pub enum RedisManagerError {
    #[error("Cannot reach endpoint {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("Endpoint {endpoint} rejected command: {reason}")]
    Command { endpoint: String, reason: String },

    #[error("No Redis endpoint configured")]
    NoEndpoints,

    #[error("Malformed replication data: {0}")]
    MalformedReplicationData(String),
}

pub type Result<T> = std::result::Result<T, RedisManagerError>;

impl RedisManagerError {
    /// Attach the endpoint to a redis error, separating transport failures
    /// from error replies sent back by a reachable server.
    pub fn from_redis(endpoint: &Endpoint, e: redis::RedisError) -> Self {
        if e.is_io_error() || e.is_connection_refusal() || e.is_timeout() || e.is_connection_dropped()
        {
            RedisManagerError::Connection {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        } else {
            RedisManagerError::Command {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        }
    }

    pub fn unknown_endpoint(endpoint: &Endpoint) -> Self {
        RedisManagerError::Connection {
            endpoint: endpoint.to_string(),
            reason: "no handle for this endpoint".to_string(),
        }
    }

    pub fn to_mcp_error(&self) -> ErrorData {
        match self {
            RedisManagerError::Command { .. } => ErrorData::invalid_params(self.to_string(), None),
            RedisManagerError::Connection { .. }
            | RedisManagerError::NoEndpoints
            | RedisManagerError::MalformedReplicationData(_) => {
                ErrorData::internal_error(self.to_string(), None)
            }
        }
    }
}
