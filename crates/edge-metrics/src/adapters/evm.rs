use serde_json::{json, Value};
use tiny_keccak::{Hasher, Keccak};

use super::HttpClient;
use crate::amount::Amount;
use crate::error::{Error, FetchError};

pub const TOTAL_SUPPLY_SIGNATURE: &str = "totalSupply()";
pub const BALANCE_OF_SIGNATURE: &str = "balanceOf(address)";

/// Compute the 4-byte selector from a canonical signature string.
pub fn selector_from_signature(signature: &str) -> [u8; 4] {
    let mut hasher = Keccak::v256();
    hasher.update(signature.as_bytes());
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Parse a `0x`-prefixed 20-byte address. Case is not checked.
pub fn parse_address(address: &str) -> Result<[u8; 20], Error> {
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| Error::Registry(format!("EVM address without 0x prefix: {address}")))?;
    let bytes =
        hex::decode(digits).map_err(|e| Error::Registry(format!("bad EVM address {address}: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| Error::Registry(format!("EVM address is not 20 bytes: {address}")))
}

pub fn total_supply_calldata() -> String {
    format!(
        "0x{}",
        hex::encode(selector_from_signature(TOTAL_SUPPLY_SIGNATURE))
    )
}

/// `balanceOf` selector followed by the holder left-padded to a 32-byte word.
pub fn balance_of_calldata(holder: &[u8; 20]) -> String {
    let mut calldata = Vec::with_capacity(36);
    calldata.extend_from_slice(&selector_from_signature(BALANCE_OF_SIGNATURE));
    calldata.extend_from_slice(&[0u8; 12]);
    calldata.extend_from_slice(holder);
    format!("0x{}", hex::encode(calldata))
}

/// ERC-20 reads over `eth_call`.
pub struct EvmRpc<'a> {
    http: &'a HttpClient,
    url: &'a str,
}

impl<'a> EvmRpc<'a> {
    pub fn new(http: &'a HttpClient, url: &'a str) -> Self {
        Self { http, url }
    }

    pub async fn total_supply(&self, contract: &str, decimals: u8) -> Result<Amount, FetchError> {
        self.call_uint(contract, total_supply_calldata(), decimals).await
    }

    pub async fn balance_of(
        &self,
        contract: &str,
        holder: &[u8; 20],
        decimals: u8,
    ) -> Result<Amount, FetchError> {
        self.call_uint(contract, balance_of_calldata(holder), decimals)
            .await
    }

    async fn call_uint(
        &self,
        contract: &str,
        data: String,
        decimals: u8,
    ) -> Result<Amount, FetchError> {
        let params = json!([{ "to": contract, "data": data }, "latest"]);
        let result = self.http.json_rpc(self.url, "eth_call", params).await?;
        match result {
            Value::String(ref quantity) => Amount::from_hex(quantity, decimals).ok_or_else(|| {
                FetchError::invalid(self.url, format!("eth_call returned non-numeric {quantity:?}"))
            }),
            other => Err(FetchError::invalid(
                self.url,
                format!("eth_call result is not a hex string: {other}"),
            )),
        }
    }
}
