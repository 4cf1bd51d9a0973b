//! The wallet: connection state plus a registry of named contracts

use std::collections::HashMap;
use std::sync::Arc;

use alloy::network::Ethereum;
use alloy::providers::{DynProvider, Provider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::TransactionReceipt;
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, TxHash};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::WalletConfig;
use crate::contract::{AbiDescriptor, Contract, ContractHandle, ContractOptions};
use crate::domain::chain::{chain_id_from_value, parse_chain_id};
use crate::domain::{InjectedProvider, Param};
use crate::error::{Result, WalletError};
use crate::infrastructure::{detect_provider, Eip1193Transport, ProviderSlot};

/// State established by a successful `connect`
///
/// Kept as one value so the wallet is either fully connected or not at all.
#[derive(Clone)]
struct Connection {
    provider: Arc<dyn InjectedProvider>,
    rpc: DynProvider,
    account: String,
    address: Address,
    chain_id: u64,
}

/// Wallet connector
///
/// Owns the connection to an injected provider and a name → contract
/// registry. `connect` takes `&mut self`, so a wallet cannot be reconnected
/// while another `connect` on it is still in flight.
pub struct Wallet {
    slot: Arc<ProviderSlot>,
    config: WalletConfig,
    connection: Option<Connection>,
    contracts: HashMap<String, ContractHandle>,
}

impl Wallet {
    /// A wallet that discovers its provider in `slot`
    pub fn new(slot: Arc<ProviderSlot>) -> Self {
        Self::with_config(slot, WalletConfig::default())
    }

    pub fn with_config(slot: Arc<ProviderSlot>, config: WalletConfig) -> Self {
        Self {
            slot,
            config,
            connection: None,
            contracts: HashMap::new(),
        }
    }

    /// Detect the injected provider, request account access and bind the RPC client
    ///
    /// Returns the selected account (the first one the provider authorized).
    /// On failure the wallet keeps whatever state it had before the call.
    pub async fn connect(&mut self) -> Result<String> {
        let provider = detect_provider(&self.slot, &self.config.detect_options())
            .await
            .ok_or(WalletError::ProviderUnavailable)?;

        debug!(provider = %provider.name(), "requesting accounts");
        let accounts = provider.request("eth_requestAccounts", Value::Null).await?;
        let account = first_account(&accounts)?;
        let address = account
            .parse::<Address>()
            .map_err(|e| WalletError::InvalidAddress {
                address: account.clone(),
                reason: e.to_string(),
            })?;

        let chain_id = read_chain_id(provider.as_ref()).await?;

        let client = RpcClient::new(Eip1193Transport::new(provider.clone()), false)
            .with_poll_interval(self.config.poll_interval());
        let rpc = RootProvider::<Ethereum>::new(client).erased();

        info!(%account, chain_id, provider = %provider.name(), "wallet connected");
        self.connection = Some(Connection {
            provider,
            rpc,
            account: account.clone(),
            address,
            chain_id,
        });
        Ok(account)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// The active account, or an empty string before `connect`
    pub fn account(&self) -> &str {
        self.connection
            .as_ref()
            .map(|conn| conn.account.as_str())
            .unwrap_or_default()
    }

    /// The active account as an address
    pub fn address(&self) -> Option<Address> {
        self.connection.as_ref().map(|conn| conn.address)
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.connection.as_ref().map(|conn| conn.chain_id)
    }

    /// The RPC client bound to the injected provider
    pub fn rpc(&self) -> Option<&DynProvider> {
        self.connection.as_ref().map(|conn| &conn.rpc)
    }

    /// The detected injected provider
    pub fn provider(&self) -> Option<&Arc<dyn InjectedProvider>> {
        self.connection.as_ref().map(|conn| &conn.provider)
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Bind `abi` at `address` to the active RPC client
    ///
    /// The handle is not registered; pass it to [`Wallet::set_contract`] for
    /// that. Transactions sent through it default to the account that was
    /// active when it was created.
    pub fn new_contract(
        &self,
        abi: impl Into<AbiDescriptor>,
        address: &str,
        options: Option<ContractOptions>,
    ) -> Result<ContractHandle> {
        let conn = self.connection.as_ref().ok_or(WalletError::NotInitialized)?;
        let address = address
            .trim()
            .parse::<Address>()
            .map_err(|e| WalletError::InvalidAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })?;

        debug!(%address, "new contract");
        let contract = Contract::new(
            abi.into(),
            address,
            conn.rpc.clone(),
            options.unwrap_or_default(),
        )
        .with_default_from(conn.address);
        Ok(Arc::new(contract))
    }

    /// Register `contract` under `name`, replacing any previous entry
    pub fn set_contract(&mut self, name: impl Into<String>, contract: ContractHandle) {
        let name = name.into();
        if self.contracts.insert(name.clone(), contract).is_some() {
            debug!(%name, "replaced registered contract");
        }
    }

    pub fn get_contract(&self, name: &str) -> Option<ContractHandle> {
        self.contracts.get(name).cloned()
    }

    /// Names currently in the registry, in no particular order
    pub fn contract_names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }

    fn registered(&self, name: &str) -> Result<&ContractHandle> {
        self.contracts
            .get(name)
            .ok_or_else(|| WalletError::ContractNotRegistered(name.to_string()))
    }

    /// Invoke `method` on the contract registered as `name` as a transaction
    /// and wait for the receipt
    pub async fn send(
        &self,
        name: &str,
        method: &str,
        params: &[Param],
    ) -> Result<TransactionReceipt> {
        self.registered(name)?.send(method, params).await
    }

    /// Like [`Wallet::send`], but resolve as soon as the provider returns the
    /// transaction hash
    pub async fn submit(&self, name: &str, method: &str, params: &[Param]) -> Result<TxHash> {
        self.registered(name)?.submit(method, params).await
    }

    /// Invoke `method` on the contract registered as `name` as a read-only call
    pub async fn call(
        &self,
        name: &str,
        method: &str,
        params: &[Param],
    ) -> Result<Vec<DynSolValue>> {
        self.registered(name)?.call(method, params).await
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("account", &self.account())
            .field("chain_id", &self.chain_id())
            .field("contracts", &self.contracts.len())
            .finish()
    }
}

fn first_account(accounts: &Value) -> Result<String> {
    let invalid = |reason: &str| WalletError::InvalidResponse {
        method: "eth_requestAccounts",
        reason: reason.to_string(),
    };
    let list = accounts
        .as_array()
        .ok_or_else(|| invalid("expected an array of accounts"))?;
    let first = list.first().ok_or(WalletError::NoAccounts)?;
    first
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid("account is not a string"))
}

async fn read_chain_id(provider: &dyn InjectedProvider) -> Result<u64> {
    if let Some(raw) = provider.chain_id() {
        return parse_chain_id(&raw).ok_or(WalletError::InvalidChainId(raw));
    }
    let value = provider.request("eth_chainId", Value::Null).await?;
    chain_id_from_value(&value).ok_or_else(|| WalletError::InvalidChainId(value.to_string()))
}
