//! Protocol adapters.
//!
//! Each adapter speaks exactly one upstream wire protocol, performs a single
//! request per call and hands back the raw amount. Failures are reported as
//! [`FetchError`]; rendering the `"Error"` label is left to callers.

pub mod cosmos;
pub mod evm;
pub mod rest;
pub mod solana;
pub mod sui;

use reqwest::Response;
use serde_json::{json, Value};
use tracing::debug;

use crate::amount::Amount;
use crate::error::FetchError;

/// Shared HTTP client used by every adapter.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Issue a JSON-RPC 2.0 call and return its `result` member.
    pub(crate) async fn json_rpc(
        &self,
        url: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, FetchError> {
        debug!(endpoint = url, method, "json-rpc request");
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .inner
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let mut payload = read_json(url, response).await?;
        if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
            return Err(FetchError::invalid(
                url,
                format!("{method} returned error: {error}"),
            ));
        }
        match payload.get_mut("result").map(Value::take) {
            Some(result) if !result.is_null() => Ok(result),
            _ => Err(FetchError::invalid(
                url,
                format!("{method} response has no `result`"),
            )),
        }
    }

    pub(crate) async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        debug!(endpoint = url, "GET json");
        let response = self
            .inner
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;
        read_json(url, response).await
    }

    pub(crate) async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(endpoint = url, "GET text");
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;
        let response = check_status(url, response)?;
        response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, e))
    }
}

fn check_status(url: &str, response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            endpoint: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

async fn read_json(url: &str, response: Response) -> Result<Value, FetchError> {
    let response = check_status(url, response)?;
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::transport(url, e))?;
    serde_json::from_str(&body).map_err(|e| FetchError::invalid(url, format!("malformed JSON: {e}")))
}

/// Follow a JSON pointer, failing with a structural error when absent.
pub(crate) fn field<'a>(url: &str, value: &'a Value, pointer: &str) -> Result<&'a Value, FetchError> {
    value
        .pointer(pointer)
        .filter(|v| !v.is_null())
        .ok_or_else(|| FetchError::invalid(url, format!("missing field `{pointer}`")))
}

/// Read a base-unit integer that upstreams encode either as a JSON string
/// or as a JSON number.
pub(crate) fn integer_amount(
    url: &str,
    value: &Value,
    pointer: &str,
    decimals: u8,
) -> Result<Amount, FetchError> {
    let raw = field(url, value, pointer)?;
    let parsed = match raw {
        Value::String(s) => Amount::parse(s, decimals),
        Value::Number(n) => n.as_u64().map(|n| Amount::new(n.into(), decimals)),
        _ => None,
    };
    parsed.ok_or_else(|| FetchError::invalid(url, format!("`{pointer}` is not an integer: {raw}")))
}

/// Read a floating-point quantity encoded as a JSON number or numeric string.
pub(crate) fn float_value(url: &str, value: &Value, pointer: &str) -> Result<f64, FetchError> {
    let raw = field(url, value, pointer)?;
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| FetchError::invalid(url, format!("`{pointer}` is not a number: {raw}")))
}
