use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use edge_metrics::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use edge_metrics::{server, CacheConfig, ChainClient, Endpoints, Registry, Resolver};

#[derive(Parser, Debug)]
#[command(name = "edge-metrics-server", version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "EDGE_METRICS_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Seconds a computed label stays fresh
    #[arg(long, env = "EDGE_METRICS_CACHE_TTL_SECS", default_value_t = 60)]
    cache_ttl_secs: u64,

    /// Maximum number of cached labels
    #[arg(long, env = "EDGE_METRICS_CACHE_CAPACITY", default_value_t = 1024)]
    cache_capacity: usize,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, env = "EDGE_METRICS_LOG_LEVEL", default_value = "info")]
    log_level: LogLevel,

    /// Log output format: pretty or json
    #[arg(long, env = "EDGE_METRICS_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    /// JSON file overriding upstream endpoints
    #[arg(long, env = "EDGE_METRICS_ENDPOINTS")]
    endpoints: Option<PathBuf>,

    /// JSON file of extra `"source->target": query` edges
    #[arg(long, env = "EDGE_METRICS_REGISTRY")]
    registry: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logging(&LogConfig {
        level: args.log_level,
        format: args.log_format,
    })?;

    let endpoints = match &args.endpoints {
        Some(path) => Endpoints::from_file(path)?,
        None => Endpoints::default(),
    };

    let mut registry = Registry::builtin();
    if let Some(path) = &args.registry {
        let json = std::fs::read_to_string(path)?;
        registry.extend(Registry::from_json(&json)?);
    }
    info!(edges = registry.len(), "registry loaded");

    let cache = CacheConfig {
        ttl: Duration::from_secs(args.cache_ttl_secs),
        capacity: args.cache_capacity,
    };
    let resolver = Arc::new(Resolver::new(registry, ChainClient::new(endpoints), cache));

    let listener = TcpListener::bind(args.bind).await?;
    server::serve(listener, resolver).await?;
    Ok(())
}
