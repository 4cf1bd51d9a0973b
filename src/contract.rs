//! Contract handles
//!
//! A [`Contract`] binds an ABI and a deployed address to the wallet's RPC
//! client. Methods are invoked by name with loosely-typed [`Param`]s; the ABI
//! decides how they are encoded.

use std::sync::Arc;

use alloy::contract::{ContractInstance, Interface};
use alloy::network::Ethereum;
use alloy::providers::{DynProvider, PendingTransactionBuilder};
use alloy::rpc::types::TransactionReceipt;
use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, Selector, TxHash, U256};
use serde_json::Value;
use tracing::debug;

use crate::domain::params::{coerce_args, select_function};
use crate::domain::Param;
use crate::error::{Result, WalletError};

/// An ABI description: one item or an ordered list of items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbiDescriptor(JsonAbi);

impl AbiDescriptor {
    /// Parse a JSON ABI: either a single item object or an array of items
    pub fn from_json(value: Value) -> Result<Self> {
        let items = match value {
            Value::Array(items) => Value::Array(items),
            item @ Value::Object(_) => Value::Array(vec![item]),
            other => {
                return Err(WalletError::InvalidAbi(format!(
                    "expected an ABI item or a list of items, got {other}"
                )))
            }
        };
        serde_json::from_value(items)
            .map(Self)
            .map_err(|e| WalletError::InvalidAbi(e.to_string()))
    }

    /// Parse a JSON ABI from text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| WalletError::InvalidAbi(e.to_string()))?;
        Self::from_json(value)
    }

    /// Parse human-readable signatures (`"function balanceOf(address) view returns (uint256)"`)
    pub fn parse<'a>(signatures: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        JsonAbi::parse(signatures)
            .map(Self)
            .map_err(|e| WalletError::InvalidAbi(e.to_string()))
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.0
    }

    pub fn into_abi(self) -> JsonAbi {
        self.0
    }
}

impl From<JsonAbi> for AbiDescriptor {
    fn from(abi: JsonAbi) -> Self {
        Self(abi)
    }
}

impl From<Function> for AbiDescriptor {
    fn from(function: Function) -> Self {
        let mut abi = JsonAbi::new();
        abi.functions
            .entry(function.name.clone())
            .or_default()
            .push(function);
        Self(abi)
    }
}

impl From<Vec<Function>> for AbiDescriptor {
    fn from(functions: Vec<Function>) -> Self {
        let mut abi = JsonAbi::new();
        for function in functions {
            abi.functions
                .entry(function.name.clone())
                .or_default()
                .push(function);
        }
        Self(abi)
    }
}

/// Per-instance call configuration
///
/// Only affects calls made through the handle it was given to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractOptions {
    /// Sender for transactions and `from` for calls; defaults to the wallet account
    pub from: Option<Address>,
    /// Gas limit for transactions
    pub gas: Option<u64>,
    /// Legacy gas price in wei
    pub gas_price: Option<u128>,
    /// Wei attached to transactions
    pub value: Option<U256>,
}

impl ContractOptions {
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }
}

/// Shared handle to a [`Contract`]; the registry and its creator may both hold one
pub type ContractHandle = Arc<Contract>;

/// A contract bound to an RPC client
#[derive(Clone)]
pub struct Contract {
    instance: ContractInstance<DynProvider>,
    options: ContractOptions,
    /// Sender used when `options.from` is unset
    default_from: Option<Address>,
}

impl Contract {
    /// Bind `abi` at `address` to `provider`
    pub fn new(
        abi: AbiDescriptor,
        address: Address,
        provider: DynProvider,
        options: ContractOptions,
    ) -> Self {
        Self {
            instance: ContractInstance::new(address, provider, Interface::new(abi.into_abi())),
            options,
            default_from: None,
        }
    }

    /// Use `from` as sender when the options name none
    pub fn with_default_from(mut self, from: Address) -> Self {
        self.default_from = Some(from);
        self
    }

    pub fn address(&self) -> &Address {
        self.instance.address()
    }

    pub fn abi(&self) -> &JsonAbi {
        self.instance.abi()
    }

    pub fn options(&self) -> &ContractOptions {
        &self.options
    }

    /// The sender this handle uses for transactions
    pub fn sender(&self) -> Option<Address> {
        self.options.from.or(self.default_from)
    }

    /// Resolve the overload matching `params` and coerce them to its inputs
    fn encode(&self, method: &str, params: &[Param]) -> Result<(Selector, Vec<DynSolValue>)> {
        let function = select_function(self.abi(), method, params.len())?;
        Ok((function.selector(), coerce_args(function, params)?))
    }

    /// Run `method` as a read-only `eth_call` and decode its return values
    pub async fn call(&self, method: &str, params: &[Param]) -> Result<Vec<DynSolValue>> {
        let (selector, args) = self.encode(method, params)?;
        debug!(address = %self.address(), method, "eth_call");

        let mut call = self.instance.function_from_selector(&selector, &args)?;
        if let Some(from) = self.sender() {
            call = call.from(from);
        }
        Ok(call.call().await?)
    }

    /// Submit `method` as a transaction and return its hash once the provider accepts it
    pub async fn submit(&self, method: &str, params: &[Param]) -> Result<TxHash> {
        let pending = self.dispatch(method, params).await?;
        Ok(*pending.tx_hash())
    }

    /// Submit `method` as a transaction and wait for its receipt
    pub async fn send(&self, method: &str, params: &[Param]) -> Result<TransactionReceipt> {
        let pending = self.dispatch(method, params).await?;
        debug!(tx_hash = %pending.tx_hash(), "waiting for receipt");
        Ok(pending.get_receipt().await?)
    }

    async fn dispatch(
        &self,
        method: &str,
        params: &[Param],
    ) -> Result<PendingTransactionBuilder<Ethereum>> {
        let (selector, args) = self.encode(method, params)?;
        debug!(address = %self.address(), method, "eth_sendTransaction");

        let mut call = self.instance.function_from_selector(&selector, &args)?;
        if let Some(from) = self.sender() {
            call = call.from(from);
        }
        if let Some(gas) = self.options.gas {
            call = call.gas(gas);
        }
        if let Some(gas_price) = self.options.gas_price {
            call = call.gas_price(gas_price);
        }
        if let Some(value) = self.options.value {
            call = call.value(value);
        }
        Ok(call.send().await?)
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("address", self.address())
            .field("functions", &self.abi().functions.len())
            .field("options", &self.options)
            .finish()
    }
}
