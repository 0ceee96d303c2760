pub mod adapters;
pub mod amount;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod registry;
pub mod resolver;
pub mod server;
pub mod tokens;

// Re-exports for convenience
pub use amount::{format_number, Amount, ERROR_LABEL};
pub use config::{CacheConfig, Endpoints};
pub use error::{Error, FetchError};
pub use handlers::ChainClient;
pub use registry::{EdgeKey, Query, Registry};
pub use resolver::{MetricSource, Resolver};

/// Resolver over the builtin edge graph, querying the given endpoints.
pub fn live_resolver(endpoints: Endpoints, cache: CacheConfig) -> Resolver {
    Resolver::new(Registry::builtin(), ChainClient::new(endpoints), cache)
}
