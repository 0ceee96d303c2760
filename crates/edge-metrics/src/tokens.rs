/// Network family a token identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// An EVM chain, named as in [`crate::config::Endpoints::evm`].
    Evm(&'static str),
    Solana,
    Cosmos,
    Sui,
}

/// Token metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMeta {
    /// Symbolic name used by the registry, e.g. `wbtc-ethereum`.
    pub key: &'static str,
    pub symbol: &'static str,
    pub network: Network,
    /// Contract address, SPL mint, bank denom or Move coin type.
    pub address: &'static str,
    pub decimals: u8,
}

pub const BTC_DECIMALS: u8 = 8;

/// Well-known EVM burn address; balances here are out of circulation.
pub const DEAD_ADDRESS: &str = "0x000000000000000000000000000000000000dEaD";

/// Ethereum escrows that lock tokens bridged to other chains.
pub const BRIDGE_ESCROWS_ETHEREUM: &[&str] = &[
    // Wormhole token bridge
    "0x3ee18B2214AFF97000D974cf647E7C347E8fa585",
    // Axelar gateway
    "0x4F4495243837681061C4743b74B3eEdf548D56A5",
    // Arbitrum L1 ERC20 gateway
    "0xa3A7B6F88361F48403514059F1F16C8E78d60EeC",
];

pub const WBTC_ETHEREUM: TokenMeta = TokenMeta {
    key: "wbtc-ethereum",
    symbol: "WBTC",
    network: Network::Evm("ethereum"),
    address: "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599",
    decimals: 8,
};

pub const CBBTC_ETHEREUM: TokenMeta = TokenMeta {
    key: "cbbtc-ethereum",
    symbol: "cbBTC",
    network: Network::Evm("ethereum"),
    address: "0xcbB7C0000aB88B473b1f5aFd9ef808440eed33Bf",
    decimals: 8,
};

pub const CBBTC_BASE: TokenMeta = TokenMeta {
    key: "cbbtc-base",
    symbol: "cbBTC",
    network: Network::Evm("base"),
    address: "0xcbB7C0000aB88B473b1f5aFd9ef808440eed33Bf",
    decimals: 8,
};

pub const TBTC_ETHEREUM: TokenMeta = TokenMeta {
    key: "tbtc-ethereum",
    symbol: "tBTC",
    network: Network::Evm("ethereum"),
    address: "0x18084fbA666a33d37592fA2633fD49a74DD93a88",
    decimals: 18,
};

pub const LBTC_ETHEREUM: TokenMeta = TokenMeta {
    key: "lbtc-ethereum",
    symbol: "LBTC",
    network: Network::Evm("ethereum"),
    address: "0x8236a87084f8B84306f72007F36F2618A5634494",
    decimals: 8,
};

pub const FBTC_ETHEREUM: TokenMeta = TokenMeta {
    key: "fbtc-ethereum",
    symbol: "FBTC",
    network: Network::Evm("ethereum"),
    address: "0xC96dE26018A54D51c097160568752c4E3BD6C364",
    decimals: 8,
};

pub const SOLVBTC_ETHEREUM: TokenMeta = TokenMeta {
    key: "solvbtc-ethereum",
    symbol: "SolvBTC",
    network: Network::Evm("ethereum"),
    address: "0x7A56E1C57C7475CCf742a1832B028F0456652F97",
    decimals: 18,
};

pub const WBTC_ARBITRUM: TokenMeta = TokenMeta {
    key: "wbtc-arbitrum",
    symbol: "WBTC",
    network: Network::Evm("arbitrum"),
    address: "0x2f2a2543B76A4166549F7aaB2e75Bef0aefC5B0f",
    decimals: 8,
};

pub const BTCB_BSC: TokenMeta = TokenMeta {
    key: "btcb-bsc",
    symbol: "BTCB",
    network: Network::Evm("bsc"),
    address: "0x7130d2A12B9BCbFAe4f2634d864A1Ee1Ce3Ead9c",
    decimals: 18,
};

pub const WBTC_SOLANA: TokenMeta = TokenMeta {
    key: "wbtc-solana",
    symbol: "WBTC",
    network: Network::Solana,
    address: "3NZ9JMVBmGAqocybic2c7LQCJScmgsAZ6vQqTDzcqmJh",
    decimals: 8,
};

pub const CBBTC_SOLANA: TokenMeta = TokenMeta {
    key: "cbbtc-solana",
    symbol: "cbBTC",
    network: Network::Solana,
    address: "cbbtcf3aa214zXHbiAZQwf4122FBYbraNdFqgw4iMij",
    decimals: 8,
};

pub const TBTC_SOLANA: TokenMeta = TokenMeta {
    key: "tbtc-solana",
    symbol: "tBTC",
    network: Network::Solana,
    address: "6DNSN2BJsaPFdFFc1zP37kkeNe4Usc1Sqkzr9C9vPWcU",
    decimals: 8,
};

pub const ALLBTC_OSMOSIS: TokenMeta = TokenMeta {
    key: "allbtc-osmosis",
    symbol: "allBTC",
    network: Network::Cosmos,
    address: "factory/osmo1z6r6qdknhgsc0zeracktgpcxf43j6sekq07nw8sxduc9lg0qjjlqfu25e3/alloyed/allBTC",
    decimals: 8,
};

pub const WBTC_AXL_OSMOSIS: TokenMeta = TokenMeta {
    key: "wbtc-axl-osmosis",
    symbol: "WBTC.axl",
    network: Network::Cosmos,
    address: "ibc/D1542AA8762DB13087D8364F3EA6509FD6F009A34F00426AF9E4F9FA85CBBF1F",
    decimals: 8,
};

pub const LBTC_SUI: TokenMeta = TokenMeta {
    key: "lbtc-sui",
    symbol: "LBTC",
    network: Network::Sui,
    address: "0x3e8e9423d80e1774a7ca128fccd8bf5f1f7753be658c5e645929037f7c819040::lbtc::LBTC",
    decimals: 8,
};

pub const WBTC_SUI: TokenMeta = TokenMeta {
    key: "wbtc-sui",
    symbol: "WBTC",
    network: Network::Sui,
    address: "0xaafb102dd0902f5055cadecd687fb5b71ca82ef0e0285d90afde828ec58ca96b::btc::BTC",
    decimals: 8,
};

pub const TOKENS: &[TokenMeta] = &[
    WBTC_ETHEREUM,
    CBBTC_ETHEREUM,
    CBBTC_BASE,
    TBTC_ETHEREUM,
    LBTC_ETHEREUM,
    FBTC_ETHEREUM,
    SOLVBTC_ETHEREUM,
    WBTC_ARBITRUM,
    BTCB_BSC,
    WBTC_SOLANA,
    CBBTC_SOLANA,
    TBTC_SOLANA,
    ALLBTC_OSMOSIS,
    WBTC_AXL_OSMOSIS,
    LBTC_SUI,
    WBTC_SUI,
];

/// Look up a token by its symbolic name.
pub fn token(key: &str) -> Option<&'static TokenMeta> {
    TOKENS.iter().find(|t| t.key == key)
}
