//! One-off REST endpoints that do not belong to a chain protocol family.

use super::{float_value, integer_amount, HttpClient};
use crate::amount::Amount;
use crate::error::FetchError;
use crate::tokens::BTC_DECIMALS;

/// Bitcoin circulating supply derived as `market_cap / price` from a
/// CoinGecko-style `simple/price` response, rounded to a whole coin.
///
/// This is an approximation, not an on-chain read.
pub async fn btc_supply_from_market_cap(http: &HttpClient, url: &str) -> Result<f64, FetchError> {
    let body = http.get_json(url, &[]).await?;
    let price = float_value(url, &body, "/bitcoin/usd")?;
    let market_cap = float_value(url, &body, "/bitcoin/usd_market_cap")?;
    if price <= 0.0 {
        return Err(FetchError::invalid(url, format!("non-positive BTC price {price}")));
    }
    Ok((market_cap / price).round())
}

/// Active staked BTC reported by a staking statistics endpoint, in satoshis.
pub async fn staking_tvl(http: &HttpClient, url: &str) -> Result<Amount, FetchError> {
    let body = http.get_json(url, &[]).await?;
    integer_amount(url, &body, "/data/total_active_tvl", BTC_DECIMALS)
}

/// Reserve attestation served as a bare number in a plain-text body.
pub async fn plaintext_reserves(http: &HttpClient, url: &str) -> Result<f64, FetchError> {
    let body = http.get_text(url).await?;
    body.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FetchError::invalid(url, format!("body is not a number: {:?}", body.trim())))
}

/// Circulating supply published by a JSON API at the given JSON pointer.
pub async fn circulating_supply(
    http: &HttpClient,
    url: &str,
    pointer: &str,
) -> Result<f64, FetchError> {
    let body = http.get_json(url, &[]).await?;
    float_value(url, &body, pointer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_btc_supply_from_market_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bitcoin": { "usd": 100000.0, "usd_market_cap": 1_987_654_321_000.0 }
            })))
            .mount(&server)
            .await;

        let url = format!("{}/price", server.uri());
        let supply = btc_supply_from_market_cap(&HttpClient::default(), &url)
            .await
            .unwrap();
        assert_eq!(supply, 19_876_543.0);
    }

    #[tokio::test]
    async fn test_zero_price_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bitcoin": { "usd": 0, "usd_market_cap": 1 }
            })))
            .mount(&server)
            .await;

        let err = btc_supply_from_market_cap(&HttpClient::default(), &server.uri())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_staking_tvl_in_satoshis() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/staking/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "total_active_tvl": "123456789012", "active_stakers": 1000 }
            })))
            .mount(&server)
            .await;

        let url = format!("{}/staking/stats", server.uri());
        let tvl = staking_tvl(&HttpClient::default(), &url).await.unwrap();
        assert_eq!(tvl.to_label(), "1234.57");
    }

    #[tokio::test]
    async fn test_plaintext_reserves() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reserves"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  4521.337\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let http = HttpClient::default();
        let reserves = plaintext_reserves(&http, &format!("{}/reserves", server.uri()))
            .await
            .unwrap();
        assert_eq!(reserves, 4521.337);

        let err = plaintext_reserves(&http, &format!("{}/broken", server.uri()))
            .await
            .unwrap_err();
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_circulating_supply_pointer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": { "circulatingSupply": "2100.5" }
            })))
            .mount(&server)
            .await;

        let http = HttpClient::default();
        let supply = circulating_supply(&http, &server.uri(), "/result/circulatingSupply")
            .await
            .unwrap();
        assert_eq!(supply, 2100.5);
    }
}
