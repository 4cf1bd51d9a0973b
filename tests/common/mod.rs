//! Scripted injected provider shared by the integration tests

#![allow(dead_code)]

use std::sync::Mutex;

use serde_json::{json, Value};
use wallet_connector::{InjectedProvider, ProviderRpcError};

pub const ACCOUNT_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const ACCOUNT_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const TOKEN: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
pub const TX_HASH: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
pub const BLOCK_HASH: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";
pub const BLOCK_NUMBER: u64 = 16;

/// Answers the handful of methods the wallet uses and records every request
pub struct MockProvider {
    pub accounts: Value,
    pub chain_id: Option<String>,
    pub rpc_chain_id: Value,
    pub call_result: String,
    pub reject_accounts: bool,
    pub reject_transactions: bool,
    pub metamask: bool,
    pub requests: Mutex<Vec<(String, Value)>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            accounts: json!([ACCOUNT_A, ACCOUNT_B]),
            chain_id: Some("0x1".to_string()),
            rpc_chain_id: json!("0x1"),
            call_result: format!("0x{}", "0".repeat(64)),
            reject_accounts: false,
            reject_transactions: false,
            metamask: true,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl MockProvider {
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests().into_iter().map(|(method, _)| method).collect()
    }

    /// Params of the last request for `method`
    pub fn last(&self, method: &str) -> Option<Value> {
        self.requests()
            .into_iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params)
    }
}

#[async_trait::async_trait]
impl InjectedProvider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        match method {
            "eth_requestAccounts" if self.reject_accounts => Err(ProviderRpcError::user_rejected()),
            "eth_requestAccounts" | "eth_accounts" => Ok(self.accounts.clone()),
            "eth_chainId" => Ok(self.rpc_chain_id.clone()),
            "eth_call" => Ok(Value::String(self.call_result.clone())),
            "eth_sendTransaction" if self.reject_transactions => {
                Err(ProviderRpcError::user_rejected())
            }
            "eth_sendTransaction" => Ok(json!(TX_HASH)),
            "eth_blockNumber" => Ok(json!(format!("{BLOCK_NUMBER:#x}"))),
            "eth_getTransactionReceipt" => Ok(receipt()),
            other => Err(ProviderRpcError::unsupported_method(other)),
        }
    }

    fn chain_id(&self) -> Option<String> {
        self.chain_id.clone()
    }

    fn is_metamask(&self) -> bool {
        self.metamask
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}

/// A successful legacy receipt for [`TX_HASH`], mined in [`BLOCK_NUMBER`]
pub fn receipt() -> Value {
    json!({
        "type": "0x0",
        "status": "0x1",
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": BLOCK_HASH,
        "blockNumber": format!("{BLOCK_NUMBER:#x}"),
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": ACCOUNT_A,
        "to": TOKEN,
        "contractAddress": null,
    })
}

/// The transaction object of a recorded `eth_call`/`eth_sendTransaction`
pub fn tx_object(params: &Value) -> &Value {
    &params[0]
}

/// Calldata of a recorded transaction object, whichever field carries it
pub fn calldata(tx: &Value) -> String {
    tx.get("input")
        .or_else(|| tx.get("data"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase()
}
