use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{schemars, tool, tool_handler, tool_router, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregator;
use crate::error::RedisManagerError;

#[derive(Clone)]
pub struct RedisManagerServer {
    aggregator: Aggregator,
    tool_router: ToolRouter<Self>,
}

// -- Tool parameter types --

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct KeyParams {
    #[schemars(description = "Key name to read")]
    pub key: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InfoParams {
    #[schemars(
        description = "Info section to retrieve (e.g. 'memory', 'stats', 'replication', 'server'). Default: all"
    )]
    #[serde(default)]
    pub section: Option<String>,
}

impl RedisManagerServer {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            tool_router: Self::tool_router(),
        }
    }

    fn err(&self, e: RedisManagerError) -> ErrorData {
        e.to_mcp_error()
    }
}

fn json_result<T: Serialize>(value: &T) -> CallToolResult {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    CallToolResult::success(vec![Content::text(text)])
}

// -- Public methods for testability --

impl RedisManagerServer {
    pub async fn do_list_endpoints(&self) -> Result<CallToolResult, ErrorData> {
        Ok(json_result(&self.aggregator.endpoints()))
    }

    pub async fn do_keys(&self) -> Result<CallToolResult, ErrorData> {
        let keys = self.aggregator.keys().await.map_err(|e| self.err(e))?;
        Ok(json_result(&serde_json::json!({
            "keys": keys,
            "count": keys.len(),
        })))
    }

    pub async fn do_value(&self, params: KeyParams) -> Result<CallToolResult, ErrorData> {
        let value = self
            .aggregator
            .value(params.key.as_bytes())
            .await
            .map_err(|e| self.err(e))?;

        let body = match value {
            Some(value) => serde_json::json!({
                "key": params.key,
                "found": true,
                "value": String::from_utf8_lossy(&value),
            }),
            None => serde_json::json!({
                "key": params.key,
                "found": false,
                "error": "Key does not exist",
            }),
        };
        Ok(json_result(&body))
    }

    pub async fn do_config(&self) -> Result<CallToolResult, ErrorData> {
        let config = self.aggregator.config().await.map_err(|e| self.err(e))?;
        Ok(json_result(&config))
    }

    pub async fn do_info(&self, params: InfoParams) -> Result<CallToolResult, ErrorData> {
        let report = match params.section.as_deref() {
            Some(section) => self.aggregator.info_section(section).await,
            None => self.aggregator.info().await,
        }
        .map_err(|e| self.err(e))?;
        Ok(json_result(&report))
    }

    pub async fn do_status(&self) -> Result<CallToolResult, ErrorData> {
        let status = self.aggregator.status().await;
        Ok(CallToolResult::success(vec![Content::text(status)]))
    }

    pub async fn do_slaves(&self) -> Result<CallToolResult, ErrorData> {
        let replicas = self.aggregator.slaves().await.map_err(|e| self.err(e))?;
        Ok(json_result(&serde_json::json!({
            "replicas": replicas,
            "count": replicas.len(),
        })))
    }
}

// -- MCP tool handlers (thin wrappers) --

#[tool_router]
impl RedisManagerServer {
    #[tool(
        name = "list_endpoints",
        description = "List the Redis endpoints queried by every fan-out tool, in merge order"
    )]
    async fn list_endpoints(&self) -> Result<CallToolResult, ErrorData> {
        self.do_list_endpoints().await
    }

    #[tool(
        name = "keys",
        description = "List every key on every endpoint, concatenated in endpoint order (not deduplicated)"
    )]
    async fn keys(&self) -> Result<CallToolResult, ErrorData> {
        self.do_keys().await
    }

    #[tool(
        name = "value",
        description = "Get the string value of a key from the keyspace database"
    )]
    async fn value(
        &self,
        Parameters(params): Parameters<KeyParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.do_value(params).await
    }

    #[tool(
        name = "config",
        description = "Get configuration parameters of all endpoints merged into one map (later endpoints win on conflicts)"
    )]
    async fn config(&self) -> Result<CallToolResult, ErrorData> {
        self.do_config().await
    }

    #[tool(
        name = "info",
        description = "Get INFO of every endpoint as a list of {section: {field: value}} entries. Optionally restrict to one section."
    )]
    async fn info(
        &self,
        Parameters(params): Parameters<InfoParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.do_info(params).await
    }

    #[tool(
        name = "status",
        description = "Get the connection status of all configured endpoints"
    )]
    async fn status(&self) -> Result<CallToolResult, ErrorData> {
        self.do_status().await
    }

    #[tool(
        name = "slaves",
        description = "List replicas (ip, port, state) connected to every endpoint"
    )]
    async fn slaves(&self) -> Result<CallToolResult, ErrorData> {
        self.do_slaves().await
    }
}

#[tool_handler]
impl ServerHandler for RedisManagerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "redis-manager".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Read-only Redis deployment overview. Tools: list_endpoints (nodes), \
                 keys (all keys), value (GET a key), config (merged CONFIG GET), \
                 info (INFO per section per node), status (connection status), \
                 slaves (replication topology)."
                    .to_string(),
            ),
        }
    }
}
