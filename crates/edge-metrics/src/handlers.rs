use async_trait::async_trait;
use futures::future::{join_all, try_join, try_join_all};
use tracing::{debug, warn};

use crate::adapters::cosmos::CosmosLcd;
use crate::adapters::evm::{self, EvmRpc};
use crate::adapters::solana::SolanaRpc;
use crate::adapters::sui::SuiRpc;
use crate::adapters::{rest, HttpClient};
use crate::amount::{format_number, Amount, ERROR_LABEL};
use crate::config::Endpoints;
use crate::error::Error;
use crate::registry::{BalanceQuery, Query};
use crate::resolver::MetricSource;

/// Outcome of summing several independent balance reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub total: Amount,
    pub resolved: usize,
    pub failed: usize,
}

impl Aggregate {
    /// Sum the successful reads; failed reads only bump `failed`.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<Amount, Error>>,
    {
        let mut aggregate = Aggregate {
            total: Amount::zero(0),
            resolved: 0,
            failed: 0,
        };
        for result in results {
            match result {
                Ok(amount) => {
                    aggregate.total = aggregate.total.add(&amount);
                    aggregate.resolved += 1;
                }
                Err(e) => {
                    debug!(error = %e, "dropping balance from aggregate");
                    aggregate.failed += 1;
                }
            }
        }
        aggregate
    }

    pub fn is_partial(&self) -> bool {
        self.failed > 0
    }

    /// The summed label. Only when every read failed is the result `"Error"`.
    pub fn to_label(&self) -> String {
        if self.resolved == 0 && self.failed > 0 {
            return ERROR_LABEL.to_string();
        }
        self.total.to_label()
    }
}

/// Executes registry queries against the live chain APIs.
///
/// Holds no state besides the HTTP client and endpoint table.
#[derive(Debug, Clone)]
pub struct ChainClient {
    http: HttpClient,
    endpoints: Endpoints,
}

impl ChainClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self::with_http(HttpClient::default(), endpoints)
    }

    pub fn with_http(http: HttpClient, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Compute the label for a query.
    ///
    /// Adapter failures propagate, except inside an aggregate where each
    /// failed read is left out of the sum.
    pub async fn metric(&self, query: &Query) -> Result<String, Error> {
        let label = match query {
            Query::EvmTotalSupply {
                chain,
                contract,
                decimals,
            } => self
                .evm(chain)?
                .total_supply(contract, *decimals)
                .await?
                .to_label(),
            Query::EvmNetSupply {
                chain,
                contract,
                excluded,
                decimals,
            } => self
                .net_supply(chain, contract, excluded, *decimals)
                .await?
                .to_label(),
            Query::Balance { read } => self.balance(read).await?.to_label(),
            Query::AggregateBalance { holders } => {
                let aggregate = self.aggregate(holders).await;
                if aggregate.is_partial() {
                    warn!(
                        resolved = aggregate.resolved,
                        failed = aggregate.failed,
                        "aggregate balance is missing some holders"
                    );
                }
                aggregate.to_label()
            }
            Query::SolanaSupply { mint } => SolanaRpc::new(&self.http, &self.endpoints.solana)
                .token_supply(mint)
                .await?
                .to_label(),
            Query::CosmosSupply { denom, decimals } => {
                CosmosLcd::new(&self.http, &self.endpoints.cosmos_lcd)
                    .supply_by_denom(denom, *decimals)
                    .await?
                    .to_label()
            }
            Query::SuiSupply { coin_type } => SuiRpc::new(&self.http, &self.endpoints.sui)
                .total_supply(coin_type)
                .await?
                .to_label(),
            Query::BtcSupplyFromMarketCap => {
                let supply =
                    rest::btc_supply_from_market_cap(&self.http, &self.endpoints.btc_price).await?;
                format_number(Some(supply))
            }
            Query::StakingTvl => rest::staking_tvl(&self.http, &self.endpoints.staking_tvl)
                .await?
                .to_label(),
            Query::PlaintextReserves { url } => {
                format_number(Some(rest::plaintext_reserves(&self.http, url).await?))
            }
            Query::CirculatingSupplyApi { url, pointer } => format_number(Some(
                rest::circulating_supply(&self.http, url, pointer).await?,
            )),
        };
        Ok(label)
    }

    fn evm(&self, chain: &str) -> Result<EvmRpc<'_>, Error> {
        Ok(EvmRpc::new(&self.http, self.endpoints.evm_rpc(chain)?))
    }

    async fn balance(&self, read: &BalanceQuery) -> Result<Amount, Error> {
        let amount = match read {
            BalanceQuery::Evm {
                chain,
                contract,
                holder,
                decimals,
            } => {
                let holder = evm::parse_address(holder)?;
                self.evm(chain)?
                    .balance_of(contract, &holder, *decimals)
                    .await?
            }
            BalanceQuery::SolanaAccount { account } => {
                SolanaRpc::new(&self.http, &self.endpoints.solana)
                    .token_account_balance(account)
                    .await?
            }
            BalanceQuery::Cosmos {
                address,
                denom,
                decimals,
            } => {
                CosmosLcd::new(&self.http, &self.endpoints.cosmos_lcd)
                    .balance_by_denom(address, denom, *decimals)
                    .await?
            }
        };
        Ok(amount)
    }

    /// Query every holder concurrently and sum whatever resolves.
    pub async fn aggregate(&self, holders: &[BalanceQuery]) -> Aggregate {
        let results = join_all(holders.iter().map(|read| self.balance(read))).await;
        Aggregate::from_results(results)
    }

    /// Total supply minus the balances of `excluded`, all read from the same
    /// contract. Decimals are applied once, to the difference.
    async fn net_supply(
        &self,
        chain: &str,
        contract: &str,
        excluded: &[String],
        decimals: u8,
    ) -> Result<Amount, Error> {
        let rpc = self.evm(chain)?;
        let holders = excluded
            .iter()
            .map(|holder| evm::parse_address(holder))
            .collect::<Result<Vec<_>, _>>()?;

        let balances = try_join_all(
            holders
                .iter()
                .map(|holder| rpc.balance_of(contract, holder, decimals)),
        );
        let (total, balances) = try_join(rpc.total_supply(contract, decimals), balances).await?;

        let excluded = balances
            .iter()
            .fold(Amount::zero(decimals), |sum, balance| sum.add(balance));
        if excluded.raw() > total.raw() {
            warn!(
                contract,
                total = %total,
                excluded = %excluded,
                "excluded balances exceed total supply"
            );
        }
        Ok(total.saturating_sub(&excluded))
    }
}

#[async_trait]
impl MetricSource for ChainClient {
    async fn compute(&self, query: &Query) -> Result<String, Error> {
        self.metric(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CONTRACT: &str = "0x8236a87084f8B84306f72007F36F2618A5634494";
    const DEAD: &str = "0x000000000000000000000000000000000000dEaD";

    fn rpc_result(raw: u64) -> serde_json::Value {
        json!({ "jsonrpc": "2.0", "id": 1, "result": format!("0x{raw:064x}") })
    }

    fn evm_balance(holder: &str) -> BalanceQuery {
        BalanceQuery::Evm {
            chain: "ethereum".to_string(),
            contract: CONTRACT.to_string(),
            holder: holder.to_string(),
            decimals: 8,
        }
    }

    #[test]
    fn test_aggregate_skips_failures() {
        let results = vec![
            Ok(Amount::parse("500000000", 8).unwrap()),
            Err(Error::Fetch(FetchError::invalid("https://rpc", "missing field `result`"))),
            Ok(Amount::parse("300000000", 8).unwrap()),
        ];
        let aggregate = Aggregate::from_results(results);
        assert_eq!(aggregate.to_label(), "8.00");
        assert_eq!(aggregate.resolved, 2);
        assert_eq!(aggregate.failed, 1);
        assert!(aggregate.is_partial());
    }

    #[test]
    fn test_aggregate_all_failed_is_error() {
        let results = vec![Err(Error::Registry("bad holder".to_string()))];
        assert_eq!(Aggregate::from_results(results).to_label(), ERROR_LABEL);
        assert_eq!(Aggregate::from_results(Vec::<Result<Amount, Error>>::new()).to_label(), "0.00");
    }

    #[tokio::test]
    async fn test_net_supply_applies_decimals_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/evm/ethereum"))
            .and(body_partial_json(json!({
                "params": [{ "to": CONTRACT, "data": "0x18160ddd" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(1_000_000_000)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/evm/ethereum"))
            .and(body_partial_json(json!({
                "params": [{ "to": CONTRACT, "data": evm::balance_of_calldata(&evm::parse_address(DEAD).unwrap()) }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(250_000_000)))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChainClient::new(Endpoints::single_host(&server.uri()));
        let query = Query::EvmNetSupply {
            chain: "ethereum".to_string(),
            contract: CONTRACT.to_string(),
            excluded: vec![DEAD.to_string()],
            decimals: 8,
        };
        assert_eq!(client.metric(&query).await.unwrap(), "7.50");
    }

    #[tokio::test]
    async fn test_net_supply_propagates_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = ChainClient::new(Endpoints::single_host(&server.uri()));
        let query = Query::EvmNetSupply {
            chain: "ethereum".to_string(),
            contract: CONTRACT.to_string(),
            excluded: vec![DEAD.to_string()],
            decimals: 8,
        };
        let err = client.metric(&query).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(ref e) if e.is_transport()));
    }

    #[tokio::test]
    async fn test_aggregate_over_http_tolerates_unreachable_holder() {
        let good_a = "0x3ee18B2214AFF97000D974cf647E7C347E8fa585";
        let good_b = "0xa3A7B6F88361F48403514059F1F16C8E78d60EeC";
        let broken = "0x4F4495243837681061C4743b74B3eEdf548D56A5";

        let server = MockServer::start().await;
        for (holder, response) in [
            (good_a, ResponseTemplate::new(200).set_body_json(rpc_result(500_000_000))),
            (good_b, ResponseTemplate::new(200).set_body_json(rpc_result(300_000_000))),
            (broken, ResponseTemplate::new(500)),
        ] {
            let data = evm::balance_of_calldata(&evm::parse_address(holder).unwrap());
            Mock::given(method("POST"))
                .and(body_partial_json(json!({ "params": [{ "data": data }] })))
                .respond_with(response)
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = ChainClient::new(Endpoints::single_host(&server.uri()));
        let query = Query::AggregateBalance {
            holders: vec![evm_balance(good_a), evm_balance(broken), evm_balance(good_b)],
        };
        assert_eq!(client.metric(&query).await.unwrap(), "8.00");
    }

    #[tokio::test]
    async fn test_solana_account_balance() {
        let account = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/solana"))
            .and(body_partial_json(json!({
                "method": "getTokenAccountBalance",
                "params": [account]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "context": { "slot": 301_000_000u64 },
                    "value": {
                        "amount": "987650000",
                        "decimals": 8,
                        "uiAmount": 9.8765,
                        "uiAmountString": "9.8765"
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChainClient::new(Endpoints::single_host(&server.uri()));
        let query = Query::Balance {
            read: BalanceQuery::SolanaAccount {
                account: account.to_string(),
            },
        };
        assert_eq!(client.metric(&query).await.unwrap(), "9.88");
    }

    #[tokio::test]
    async fn test_cosmos_balance() {
        let address = "osmo1qy8zz3ah4d8y7y4qhkvmxm5ktxk2y8pfqcxdp0";
        let denom = "ibc/D1542AA8762DB13087D8364F3EA6509FD6F009A34F00426AF9E4F9FA85CBBF1F";
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!(
                "/lcd/cosmos/bank/v1beta1/balances/{address}/by_denom"
            )))
            .and(query_param("denom", denom))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "balance": { "denom": denom, "amount": "250000000" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChainClient::new(Endpoints::single_host(&server.uri()));
        let query = Query::Balance {
            read: BalanceQuery::Cosmos {
                address: address.to_string(),
                denom: denom.to_string(),
                decimals: 8,
            },
        };
        assert_eq!(client.metric(&query).await.unwrap(), "2.50");
    }

    #[tokio::test]
    async fn test_plaintext_reserves() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reserves.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  15234.5678\n"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChainClient::new(Endpoints::single_host(&server.uri()));
        let query = Query::PlaintextReserves {
            url: format!("{}/reserves.txt", server.uri()),
        };
        assert_eq!(client.metric(&query).await.unwrap(), "15234.57");
    }

    #[tokio::test]
    async fn test_circulating_supply_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/supply"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": { "circulating": "20999.994" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChainClient::new(Endpoints::single_host(&server.uri()));
        let query = Query::CirculatingSupplyApi {
            url: format!("{}/supply", server.uri()),
            pointer: "/result/circulating".to_string(),
        };
        assert_eq!(client.metric(&query).await.unwrap(), "20999.99");
    }

    #[tokio::test]
    async fn test_unknown_chain_is_registry_error() {
        let client = ChainClient::new(Endpoints::default());
        let query = Query::EvmTotalSupply {
            chain: "fantom".to_string(),
            contract: CONTRACT.to_string(),
            decimals: 8,
        };
        assert!(matches!(client.metric(&query).await, Err(Error::Registry(_))));
    }

    #[tokio::test]
    async fn test_btc_supply_label() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bitcoin": { "usd": 50000, "usd_market_cap": 990_000_000_000u64 }
            })))
            .mount(&server)
            .await;

        let client = ChainClient::new(Endpoints::single_host(&server.uri()));
        let label = client.metric(&Query::BtcSupplyFromMarketCap).await.unwrap();
        assert_eq!(label, "19800000.00");
    }
}
