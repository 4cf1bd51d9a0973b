//! Wallet connector for injected Ethereum providers
//!
//! Detects a provider a host has injected, asks it for account access, binds
//! an alloy RPC client to it and keeps a registry of named contracts that can
//! be invoked with `send` (transaction) or `call` (read-only query).
//!
//! ```no_run
//! # async fn run() -> wallet_connector::Result<()> {
//! use std::sync::Arc;
//! use wallet_connector::{AbiDescriptor, HttpProvider, Param, ProviderSlot, Wallet};
//!
//! let slot = Arc::new(ProviderSlot::new());
//! slot.inject(Arc::new(HttpProvider::new("http://127.0.0.1:8545")?));
//!
//! let mut wallet = Wallet::with_config(slot, wallet_connector::config::load());
//! let account = wallet.connect().await?;
//!
//! let abi = AbiDescriptor::parse(["function balanceOf(address) view returns (uint256)"])?;
//! let token = wallet.new_contract(abi, "0x5FbDB2315678afecb367f032d93F642f64180aa3", None)?;
//! wallet.set_contract("token", token);
//!
//! let balance = wallet.call("token", "balanceOf", &[Param::from(account)]).await?;
//! # let _ = balance;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod contract;
pub mod domain;
pub mod error;
pub mod infrastructure;
mod wallet;

pub use config::WalletConfig;
pub use contract::{AbiDescriptor, Contract, ContractHandle, ContractOptions};
pub use domain::{InjectedProvider, Param, ProviderRpcError};
pub use error::{Result, WalletError};
pub use infrastructure::{detect_provider, DetectOptions, HttpProvider, ProviderSlot};
pub use wallet::Wallet;
