//! Injected provider abstraction
//!
//! Models the EIP-1193 request surface a wallet application exposes to its
//! host: a single `request(method, params)` entry point plus a few pieces of
//! metadata. Anything that answers these calls can drive a [`Wallet`].
//!
//! [`Wallet`]: crate::Wallet

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error object returned by an injected provider
///
/// Mirrors the EIP-1193 `ProviderRpcError` shape so it can be handed back to
/// the JSON-RPC layer without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("provider error {code}: {message}")]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderRpcError {
    /// The user rejected the request
    pub const USER_REJECTED: i64 = 4001;
    /// The provider does not support the requested method
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The provider is disconnected from all chains
    pub const DISCONNECTED: i64 = 4900;
    /// JSON-RPC internal error
    pub const INTERNAL: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(Self::USER_REJECTED, "User rejected the request.")
    }

    pub fn unsupported_method(method: &str) -> Self {
        Self::new(
            Self::UNSUPPORTED_METHOD,
            format!("The Provider does not support the requested method: {method}"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL, message)
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Capability shape of an injected wallet provider
///
/// Implementations are expected to be cheap to share; the wallet holds them
/// behind an `Arc` and the RPC transport clones that `Arc` per request.
#[async_trait::async_trait]
pub trait InjectedProvider: Send + Sync + 'static {
    /// Issue a JSON-RPC request (`eth_requestAccounts`, `eth_call`, ...)
    ///
    /// `params` is the positional parameter array, or `Value::Null` when the
    /// method takes none.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError>;

    /// The chain id the provider currently reports, in its native string form
    /// (usually `0x`-prefixed hex)
    ///
    /// Returns `None` when the provider does not expose the property; the
    /// wallet then falls back to `eth_chainId`.
    fn chain_id(&self) -> Option<String> {
        None
    }

    /// Whether this provider identifies itself as MetaMask
    fn is_metamask(&self) -> bool {
        false
    }

    /// Human-readable name for logs
    fn name(&self) -> String {
        "injected".to_string()
    }
}
