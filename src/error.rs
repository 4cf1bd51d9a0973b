//! Error taxonomy for wallet operations

use crate::domain::provider::ProviderRpcError;

/// Result alias used across the crate
pub type Result<T, E = WalletError> = std::result::Result<T, E>;

/// Everything a wallet operation can fail with.
///
/// The first three variants are the connector's own precondition failures.
/// `Provider`, `Contract` and `PendingTransaction` carry errors raised by the
/// injected provider or the RPC stack, passed through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// No compatible injected provider was found during `connect`
    #[error("Please install MetaMask!")]
    ProviderUnavailable,

    /// A contract was requested before `connect` succeeded
    #[error("please init web3!")]
    NotInitialized,

    /// `send`/`call` referenced a name that is not in the registry
    #[error("Contract not set! ({0})")]
    ContractNotRegistered(String),

    /// Error returned by the injected provider (user rejection, timeout, ...)
    #[error(transparent)]
    Provider(#[from] ProviderRpcError),

    /// The provider authorized no accounts
    #[error("provider returned no accounts")]
    NoAccounts,

    /// The provider answered with something we could not interpret
    #[error("invalid response to {method}: {reason}")]
    InvalidResponse { method: &'static str, reason: String },

    #[error("invalid chain id: {0:?}")]
    InvalidChainId(String),

    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid RPC URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid ABI: {0}")]
    InvalidAbi(String),

    #[error("method {method:?} not found in contract ABI")]
    UnknownMethod { method: String },

    #[error("argument count mismatch for {method}: expected one of {expected:?}, got {got}")]
    ArgumentCount {
        method: String,
        expected: Vec<usize>,
        got: usize,
    },

    #[error("failed to parse argument {index} of {method} as {kind}: {reason}")]
    InvalidParam {
        method: String,
        index: usize,
        kind: String,
        reason: String,
    },

    /// Encoding, transport or execution failure from the contract binding
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),

    /// Failure while waiting for a transaction receipt
    #[error(transparent)]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),

    #[error("config error: {0}")]
    Config(String),
}

impl WalletError {
    /// True when the error is a user rejection reported by the provider (EIP-1193 code 4001)
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WalletError::Provider(err) if err.code == ProviderRpcError::USER_REJECTED)
    }
}
