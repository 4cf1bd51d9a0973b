//! Domain models - provider capability, call parameters, chain ids
//!
//! Nothing in here talks to the network; the infrastructure layer supplies the
//! implementations.

pub mod chain;
pub mod params;
pub mod provider;

pub use chain::parse_chain_id;
pub use params::Param;
pub use provider::{InjectedProvider, ProviderRpcError};
