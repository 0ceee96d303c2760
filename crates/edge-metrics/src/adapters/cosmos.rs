use super::{integer_amount, HttpClient};
use crate::amount::Amount;
use crate::error::FetchError;

/// Bank module reads against a Cosmos LCD (REST) host.
///
/// The bank endpoints never report decimals, so every call takes the
/// exponent from the caller.
pub struct CosmosLcd<'a> {
    http: &'a HttpClient,
    base: &'a str,
}

impl<'a> CosmosLcd<'a> {
    pub fn new(http: &'a HttpClient, base: &'a str) -> Self {
        Self { http, base }
    }

    pub async fn supply_by_denom(&self, denom: &str, decimals: u8) -> Result<Amount, FetchError> {
        let url = format!(
            "{}/cosmos/bank/v1beta1/supply/by_denom",
            self.base.trim_end_matches('/')
        );
        let body = self.http.get_json(&url, &[("denom", denom)]).await?;
        integer_amount(&url, &body, "/amount/amount", decimals)
    }

    pub async fn balance_by_denom(
        &self,
        address: &str,
        denom: &str,
        decimals: u8,
    ) -> Result<Amount, FetchError> {
        let url = format!(
            "{}/cosmos/bank/v1beta1/balances/{address}/by_denom",
            self.base.trim_end_matches('/')
        );
        let body = self.http.get_json(&url, &[("denom", denom)]).await?;
        integer_amount(&url, &body, "/balance/amount", decimals)
    }
}
