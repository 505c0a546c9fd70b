use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use redis_manager::aggregator::Aggregator;
use redis_manager::backend::{RedisEndpoint, RedisMultiplexer};
use redis_manager::connection::Endpoint;
use redis_manager::server::RedisManagerServer;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

/// Read-only overview of a Redis deployment: keys, config, INFO and replicas
#[derive(Parser)]
#[command(name = "redis-manager", version, about)]
struct Cli {
    /// Redis endpoint URL (repeatable, one per node).
    /// Example: redis://127.0.0.1:6379
    #[arg(long = "url")]
    urls: Vec<String>,

    /// Read a Redis URL from an environment variable (repeatable).
    /// Example: --url-env REDIS_URL
    #[arg(long = "url-env")]
    url_envs: Vec<String>,

    /// COUNT hint for each SCAN round trip when listing keys (default: 100)
    #[arg(long, default_value = "100")]
    scan_count: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut all_urls = cli.urls.clone();

    for env_name in &cli.url_envs {
        match std::env::var(env_name) {
            Ok(url) => {
                tracing::info!(env = env_name, "Read Redis URL from environment variable");
                all_urls.push(url);
            }
            Err(_) => {
                bail!("Environment variable '{env_name}' is not set");
            }
        }
    }

    if all_urls.is_empty() {
        all_urls.push("redis://127.0.0.1:6379".to_string());
        tracing::info!("No URL provided, defaulting to redis://127.0.0.1:6379");
    }

    let mut endpoints: Vec<RedisEndpoint> = Vec::new();
    for (i, url_str) in all_urls.iter().enumerate() {
        let endpoint = Endpoint::new(endpoint_name(url_str, i));
        if endpoints.iter().any(|e| e.endpoint == endpoint) {
            tracing::warn!(endpoint = %endpoint, "Skipping duplicate endpoint");
            continue;
        }

        let client = redis::Client::open(url_str.as_str())
            .map_err(|e| anyhow::anyhow!("Invalid Redis URL '{}': {}", redact_url(url_str), e))?;

        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot connect to '{}': {}", redact_url(url_str), e))?;

        tracing::info!(endpoint = %endpoint, url = %redact_url(url_str), "Connected to Redis");

        endpoints.push(RedisEndpoint {
            endpoint,
            url_redacted: redact_url(url_str),
            conn,
        });
    }

    tracing::info!(
        endpoints = endpoints.len(),
        scan_count = cli.scan_count,
        "Starting redis-manager server"
    );

    let connection = RedisMultiplexer::new(endpoints, cli.scan_count);
    let service = RedisManagerServer::new(Aggregator::new(Arc::new(connection)));
    let running = service.serve(stdio()).await?;
    running.waiting().await?;

    Ok(())
}

/// `host:port`, with `/db` appended for a non-default database.
fn endpoint_name(url_str: &str, index: usize) -> String {
    if let Ok(parsed) = url::Url::parse(url_str) {
        let host = parsed.host_str().unwrap_or("unknown");
        let port = parsed.port().unwrap_or(6379);
        let db = parsed.path().trim_start_matches('/');
        if db.is_empty() || db == "0" {
            format!("{}:{}", host, port)
        } else {
            format!("{}:{}/{}", host, port, db)
        }
    } else {
        format!("redis-{}", index)
    }
}

fn redact_url(url_str: &str) -> String {
    match url::Url::parse(url_str) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => url_str.to_string(),
    }
}
