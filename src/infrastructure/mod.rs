//! Infrastructure layer - provider discovery and RPC plumbing
//!
//! This layer contains:
//! - Injection slot and bounded-wait provider detection
//! - An alloy transport that speaks through an injected provider
//! - An HTTP-backed provider for non-browser hosts

pub mod detect;
pub mod http;
pub mod transport;

pub use detect::{detect_provider, DetectOptions, ProviderSlot, DEFAULT_DETECT_TIMEOUT};
pub use http::HttpProvider;
pub use transport::Eip1193Transport;
