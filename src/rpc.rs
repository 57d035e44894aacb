//! JSON-RPC ledger client
//!
//! Defines the [`Ledger`] capability the poller consumes and its HTTP
//! implementation over an EVM JSON-RPC endpoint.

use crate::error::RpcError;
use crate::types::{parse_hex_u64, Block, Receipt};
use alloy_primitives::B256;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Read-only view of the chain used by the poller.
///
/// Every call may fail with a transient [`RpcError`]. `None` means the node
/// does not (yet) know the requested object.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Chain identifier reported by the node.
    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// Current chain head height.
    async fn block_number(&self) -> Result<u64, RpcError>;

    /// Block at `number` with full transaction bodies.
    async fn block_with_transactions(&self, number: u64) -> Result<Option<Block>, RpcError>;

    /// Execution receipt for a transaction.
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<Receipt>, RpcError>;
}

/// JSON-RPC client for EVM nodes.
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
}

impl RpcClient {
    /// Create a new RPC client whose requests give up after `timeout`.
    pub fn new(url: String, timeout: Duration) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a JSON-RPC call and return its `result` value.
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        let mut response: Value = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.get("error") {
            return Err(RpcError::Node {
                code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }

        response
            .get_mut("result")
            .map(Value::take)
            .ok_or(RpcError::MissingResult)
    }

    /// Call a method whose result is a single hex quantity.
    async fn call_quantity(&self, method: &str) -> Result<u64, RpcError> {
        let result = self.call(method, json!([])).await?;
        let s = result
            .as_str()
            .ok_or_else(|| RpcError::InvalidHex(result.to_string()))?;
        parse_hex_u64(s).map_err(|_| RpcError::InvalidHex(s.to_string()))
    }
}

#[async_trait]
impl Ledger for RpcClient {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        self.call_quantity("eth_chainId").await
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        self.call_quantity("eth_blockNumber").await
    }

    async fn block_with_transactions(&self, number: u64) -> Result<Option<Block>, RpcError> {
        let params = json!([format!("0x{:x}", number), true]);
        let result = self.call("eth_getBlockByNumber", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<Receipt>, RpcError> {
        let params = json!([format!("0x{:x}", tx_hash)]);
        let result = self.call("eth_getTransactionReceipt", params).await?;
        Ok(serde_json::from_value(result)?)
    }
}
