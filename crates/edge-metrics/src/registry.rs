use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::tokens::{self, TokenMeta};

/// Identifies a graph edge as `"source->target"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey(String);

impl EdgeKey {
    pub const SEPARATOR: &'static str = "->";

    pub fn new(source: &str, target: &str) -> Self {
        Self(format!("{source}{}{target}", Self::SEPARATOR))
    }

    /// Parse a rendered `"source->target"` key.
    pub fn parse(key: &str) -> Result<Self, Error> {
        match key.split_once(Self::SEPARATOR) {
            Some((source, target)) if !source.is_empty() && !target.is_empty() => {
                Ok(Self::new(source, target))
            }
            _ => Err(Error::Registry(format!("malformed edge key: {key:?}"))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single balance read, one element of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BalanceQuery {
    Evm {
        chain: String,
        contract: String,
        holder: String,
        decimals: u8,
    },
    SolanaAccount {
        account: String,
    },
    Cosmos {
        address: String,
        denom: String,
        decimals: u8,
    },
}

/// What to compute for an edge, with every argument bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    /// ERC-20 `totalSupply()`.
    EvmTotalSupply {
        chain: String,
        contract: String,
        decimals: u8,
    },
    /// Total supply minus the summed balances of `excluded` holders.
    EvmNetSupply {
        chain: String,
        contract: String,
        excluded: Vec<String>,
        decimals: u8,
    },
    Balance {
        read: BalanceQuery,
    },
    /// Sum of independent balance reads; failed reads are left out.
    AggregateBalance {
        holders: Vec<BalanceQuery>,
    },
    SolanaSupply {
        mint: String,
    },
    CosmosSupply {
        denom: String,
        decimals: u8,
    },
    SuiSupply {
        coin_type: String,
    },
    BtcSupplyFromMarketCap,
    StakingTvl,
    PlaintextReserves {
        url: String,
    },
    CirculatingSupplyApi {
        url: String,
        pointer: String,
    },
}

impl Query {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::EvmTotalSupply { .. } => "evm_total_supply",
            Query::EvmNetSupply { .. } => "evm_net_supply",
            Query::Balance { .. } => "balance",
            Query::AggregateBalance { .. } => "aggregate_balance",
            Query::SolanaSupply { .. } => "solana_supply",
            Query::CosmosSupply { .. } => "cosmos_supply",
            Query::SuiSupply { .. } => "sui_supply",
            Query::BtcSupplyFromMarketCap => "btc_supply_from_market_cap",
            Query::StakingTvl => "staking_tvl",
            Query::PlaintextReserves { .. } => "plaintext_reserves",
            Query::CirculatingSupplyApi { .. } => "circulating_supply_api",
        }
    }

    /// Total supply of a token from the reference table, using the read
    /// appropriate for its network.
    pub fn supply_of(token: &TokenMeta) -> Self {
        match token.network {
            tokens::Network::Evm(chain) => Query::EvmTotalSupply {
                chain: chain.to_string(),
                contract: token.address.to_string(),
                decimals: token.decimals,
            },
            tokens::Network::Solana => Query::SolanaSupply {
                mint: token.address.to_string(),
            },
            tokens::Network::Cosmos => Query::CosmosSupply {
                denom: token.address.to_string(),
                decimals: token.decimals,
            },
            tokens::Network::Sui => Query::SuiSupply {
                coin_type: token.address.to_string(),
            },
        }
    }
}

/// Static table from edge to bound query.
///
/// Keys must match the node identifiers of the graph topology exactly; a
/// missing key simply means the edge carries no dynamic label.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    edges: HashMap<EdgeKey, Query>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the query for `source -> target`.
    pub fn insert(&mut self, source: &str, target: &str, query: Query) {
        self.edges.insert(EdgeKey::new(source, target), query);
    }

    pub fn get(&self, key: &EdgeKey) -> Option<&Query> {
        self.edges.get(key)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.keys()
    }

    /// Parse a registry from a JSON object of `"source->target": query`.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: HashMap<String, Query> = serde_json::from_str(json)
            .map_err(|e| Error::Registry(format!("invalid registry JSON: {e}")))?;
        let mut edges = HashMap::with_capacity(raw.len());
        for (key, query) in raw {
            edges.insert(EdgeKey::parse(&key)?, query);
        }
        Ok(Self { edges })
    }

    /// Add every edge from `other`, replacing existing entries.
    pub fn extend(&mut self, other: Registry) {
        self.edges.extend(other.edges);
    }

    /// The edges of the BTC token-flow graph.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.insert("bitcoin", "btc", Query::BtcSupplyFromMarketCap);
        registry.insert("btc", "babylon", Query::StakingTvl);

        // issuers
        registry.insert("bitgo", "wbtc", Query::supply_of(&tokens::WBTC_ETHEREUM));
        registry.insert("coinbase", "cbbtc", Query::supply_of(&tokens::CBBTC_ETHEREUM));
        registry.insert("threshold", "tbtc", Query::supply_of(&tokens::TBTC_ETHEREUM));
        registry.insert("ignition", "fbtc", Query::supply_of(&tokens::FBTC_ETHEREUM));
        registry.insert("solv", "solvbtc", Query::supply_of(&tokens::SOLVBTC_ETHEREUM));
        registry.insert("binance", "btcb", Query::supply_of(&tokens::BTCB_BSC));
        registry.insert(
            "lombard",
            "lbtc",
            Query::EvmNetSupply {
                chain: "ethereum".to_string(),
                contract: tokens::LBTC_ETHEREUM.address.to_string(),
                excluded: vec![tokens::DEAD_ADDRESS.to_string()],
                decimals: tokens::LBTC_ETHEREUM.decimals,
            },
        );

        // wrapped representations on other chains
        registry.insert("wbtc", "wbtc-arbitrum", Query::supply_of(&tokens::WBTC_ARBITRUM));
        registry.insert("wbtc", "wbtc-solana", Query::supply_of(&tokens::WBTC_SOLANA));
        registry.insert("wbtc", "wbtc-sui", Query::supply_of(&tokens::WBTC_SUI));
        registry.insert("wbtc", "wbtc-axl-osmosis", Query::supply_of(&tokens::WBTC_AXL_OSMOSIS));
        registry.insert("cbbtc", "cbbtc-base", Query::supply_of(&tokens::CBBTC_BASE));
        registry.insert("cbbtc", "cbbtc-solana", Query::supply_of(&tokens::CBBTC_SOLANA));
        registry.insert("tbtc", "tbtc-solana", Query::supply_of(&tokens::TBTC_SOLANA));
        registry.insert("lbtc", "lbtc-sui", Query::supply_of(&tokens::LBTC_SUI));
        registry.insert("osmosis", "allbtc", Query::supply_of(&tokens::ALLBTC_OSMOSIS));

        // WBTC locked in Ethereum bridge escrows
        let holders = tokens::BRIDGE_ESCROWS_ETHEREUM
            .iter()
            .map(|holder| BalanceQuery::Evm {
                chain: "ethereum".to_string(),
                contract: tokens::WBTC_ETHEREUM.address.to_string(),
                holder: holder.to_string(),
                decimals: tokens::WBTC_ETHEREUM.decimals,
            })
            .collect();
        registry.insert("wbtc", "bridges", Query::AggregateBalance { holders });

        registry
    }
}
