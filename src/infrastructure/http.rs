//! Injected-provider adapter over a JSON-RPC HTTP endpoint
//!
//! Lets a node with unlocked accounts (anvil, a dev geth) stand in for a
//! browser wallet. Requests go through alloy's HTTP transport;
//! `eth_requestAccounts` falls back to `eth_accounts` on nodes that do not
//! know the former.

use alloy::network::Ethereum;
use alloy::providers::{DynProvider, Provider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::transports::http::Http;
use alloy::transports::TransportError;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::{InjectedProvider, ProviderRpcError};
use crate::error::{Result, WalletError};

const METHOD_NOT_FOUND: i64 = -32601;

/// [`InjectedProvider`] that forwards requests to an HTTP JSON-RPC endpoint
#[derive(Clone)]
pub struct HttpProvider {
    rpc: DynProvider,
    /// Scheme and host only; paths and query strings often carry API keys
    endpoint: String,
}

impl HttpProvider {
    pub fn new(url: &str) -> Result<Self> {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: &str) -> Result<Self> {
        let url = url.parse::<Url>().map_err(|e| WalletError::InvalidUrl {
            url: redact(url),
            reason: e.to_string(),
        })?;
        let endpoint = endpoint_of(&url);

        let http = Http::with_client(client, url);
        let is_local = http.guess_local();
        let rpc = RootProvider::<Ethereum>::new(RpcClient::new(http, is_local)).erased();

        Ok(Self { rpc, endpoint })
    }

    async fn forward(&self, method: &str, params: &Value) -> Result<Value, ProviderRpcError> {
        // Nodes reject `"params": null`
        let params = if params.is_null() { json!([]) } else { params.clone() };
        debug!(endpoint = %self.endpoint, method, "http request");

        self.rpc
            .raw_request::<Value, Value>(method.to_string().into(), params)
            .await
            .map_err(provider_error)
    }
}

#[async_trait::async_trait]
impl InjectedProvider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        match self.forward(method, &params).await {
            Err(err) if method == "eth_requestAccounts" && err.code == METHOD_NOT_FOUND => {
                debug!("endpoint lacks eth_requestAccounts, using eth_accounts");
                self.forward("eth_accounts", &params).await
            }
            other => other,
        }
    }

    fn name(&self) -> String {
        self.endpoint.clone()
    }
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Map an alloy RPC failure onto the EIP-1193 error shape
fn provider_error(err: TransportError) -> ProviderRpcError {
    if let Some(payload) = err.as_error_resp() {
        let rpc_err = ProviderRpcError::new(payload.code, payload.message.to_string());
        return match payload
            .data
            .as_ref()
            .and_then(|raw| serde_json::from_str::<Value>(raw.get()).ok())
        {
            Some(data) => rpc_err.with_data(data),
            None => rpc_err,
        };
    }
    if err.is_transport_error() {
        return ProviderRpcError::new(ProviderRpcError::DISCONNECTED, err.to_string());
    }
    ProviderRpcError::internal(err.to_string())
}

fn endpoint_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    }
}

/// Best-effort scheme://host of an unparseable URL for error messages
fn redact(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            format!("{scheme}://{host}")
        }
        None => "<invalid>".to_string(),
    }
}
