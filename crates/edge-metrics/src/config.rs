use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Base URLs of every upstream the adapters talk to.
///
/// Loaded once at start-up and never mutated. Any field may be overridden
/// from a JSON file; missing fields keep their mainnet defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// EVM JSON-RPC endpoints keyed by chain name. Overrides are merged
    /// per chain over the defaults.
    #[serde(deserialize_with = "evm_over_defaults")]
    pub evm: BTreeMap<String, String>,
    pub solana: String,
    pub sui: String,
    /// Cosmos LCD (REST) host.
    pub cosmos_lcd: String,
    /// Price API returning BTC price and market cap.
    pub btc_price: String,
    /// Staking statistics endpoint reporting active TVL in satoshis.
    pub staking_tvl: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        let evm = [
            ("ethereum", "https://ethereum-rpc.publicnode.com"),
            ("base", "https://mainnet.base.org"),
            ("arbitrum", "https://arb1.arbitrum.io/rpc"),
            ("bsc", "https://bsc-dataseed.binance.org"),
        ]
        .into_iter()
        .map(|(chain, url)| (chain.to_string(), url.to_string()))
        .collect();

        Self {
            evm,
            solana: "https://api.mainnet-beta.solana.com".to_string(),
            sui: "https://fullnode.mainnet.sui.io:443".to_string(),
            cosmos_lcd: "https://lcd.osmosis.zone".to_string(),
            btc_price: "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd&include_market_cap=true".to_string(),
            staking_tvl: "https://staking-api.babylonlabs.io/v2/stats".to_string(),
        }
    }
}

fn evm_over_defaults<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut evm = Endpoints::default().evm;
    evm.extend(overrides);
    Ok(evm)
}

impl Endpoints {
    /// Parse endpoint overrides from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid endpoints: {e}")))
    }

    /// Load endpoint overrides from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Point every endpoint at a single base URL (used against local mocks).
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let evm = Self::default()
            .evm
            .into_keys()
            .map(|chain| {
                let url = format!("{base}/evm/{chain}");
                (chain, url)
            })
            .collect();
        Self {
            evm,
            solana: format!("{base}/solana"),
            sui: format!("{base}/sui"),
            cosmos_lcd: format!("{base}/lcd"),
            btc_price: format!("{base}/price"),
            staking_tvl: format!("{base}/staking/stats"),
        }
    }

    /// JSON-RPC URL for an EVM chain.
    pub fn evm_rpc(&self, chain: &str) -> Result<&str, Error> {
        self.evm
            .get(chain)
            .map(String::as_str)
            .ok_or_else(|| Error::Registry(format!("no RPC endpoint for EVM chain '{chain}'")))
    }
}

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Resolver cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
