use serde_json::{json, Value};

use super::{field, integer_amount, HttpClient};
use crate::amount::Amount;
use crate::error::FetchError;

/// SPL token reads over Solana JSON-RPC.
pub struct SolanaRpc<'a> {
    http: &'a HttpClient,
    url: &'a str,
}

impl<'a> SolanaRpc<'a> {
    pub fn new(http: &'a HttpClient, url: &'a str) -> Self {
        Self { http, url }
    }

    /// Total supply of an SPL mint.
    pub async fn token_supply(&self, mint: &str) -> Result<Amount, FetchError> {
        let result = self
            .http
            .json_rpc(self.url, "getTokenSupply", json!([mint]))
            .await?;
        self.ui_token_amount(&result)
    }

    /// Balance of a single SPL token account.
    pub async fn token_account_balance(&self, account: &str) -> Result<Amount, FetchError> {
        let result = self
            .http
            .json_rpc(self.url, "getTokenAccountBalance", json!([account]))
            .await?;
        self.ui_token_amount(&result)
    }

    /// Both calls answer with `{ value: { amount, decimals, .. } }`.
    fn ui_token_amount(&self, result: &Value) -> Result<Amount, FetchError> {
        let decimals = field(self.url, result, "/value/decimals")?
            .as_u64()
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| FetchError::invalid(self.url, "`/value/decimals` is not a small integer"))?;
        integer_amount(self.url, result, "/value/amount", decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MINT: &str = "3NZ9JMVBmGAqocybic2c7LQCJScmgsAZ6vQqTDzcqmJh";

    #[tokio::test]
    async fn test_token_supply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "getTokenSupply",
                "params": [MINT]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "context": { "slot": 310000000 },
                    "value": {
                        "amount": "12345678901",
                        "decimals": 8,
                        "uiAmount": 123.45678901,
                        "uiAmountString": "123.45678901"
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let http = HttpClient::default();
        let url = server.uri();
        let supply = SolanaRpc::new(&http, &url).token_supply(MINT).await.unwrap();
        assert_eq!(supply.decimals(), 8);
        assert_eq!(supply.to_label(), "123.46");
    }

    #[tokio::test]
    async fn test_missing_value_is_structural() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": { "context": { "slot": 1 } }
            })))
            .mount(&server)
            .await;

        let http = HttpClient::default();
        let url = server.uri();
        let err = SolanaRpc::new(&http, &url)
            .token_account_balance("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse { .. }));
    }
}
