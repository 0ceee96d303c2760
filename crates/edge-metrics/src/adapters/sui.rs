use serde_json::json;

use super::{field, integer_amount, HttpClient};
use crate::amount::Amount;
use crate::error::FetchError;

/// Exponent assumed when coin metadata omits `decimals`.
pub const DEFAULT_SUI_DECIMALS: u8 = 8;

/// Coin metadata reads over Sui JSON-RPC.
pub struct SuiRpc<'a> {
    http: &'a HttpClient,
    url: &'a str,
}

impl<'a> SuiRpc<'a> {
    pub fn new(http: &'a HttpClient, url: &'a str) -> Self {
        Self { http, url }
    }

    /// Total supply reported in the coin metadata of a Move coin type.
    pub async fn total_supply(&self, coin_type: &str) -> Result<Amount, FetchError> {
        let result = self
            .http
            .json_rpc(self.url, "suix_getCoinMetadata", json!([coin_type]))
            .await?;

        let decimals = match field(self.url, &result, "/decimals") {
            Ok(value) => value
                .as_u64()
                .and_then(|d| u8::try_from(d).ok())
                .ok_or_else(|| FetchError::invalid(self.url, "`decimals` is not a small integer"))?,
            Err(_) => DEFAULT_SUI_DECIMALS,
        };
        integer_amount(self.url, &result, "/total_supply", decimals)
    }
}
