//! Injected provider discovery
//!
//! A host (browser bridge, embedding application, test harness) places its
//! provider into a [`ProviderSlot`]. Detection looks there first and, if the
//! slot is still empty, waits a bounded amount of time for a late injection.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::domain::InjectedProvider;

/// Default wait for late injection
pub const DEFAULT_DETECT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Where a host injects its provider
#[derive(Default)]
pub struct ProviderSlot {
    provider: RwLock<Option<Arc<dyn InjectedProvider>>>,
    injected: Notify,
}

impl ProviderSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `provider`
    pub fn with_provider(provider: Arc<dyn InjectedProvider>) -> Self {
        let slot = Self::new();
        slot.inject(provider);
        slot
    }

    /// Install `provider`, replacing whatever was there, and wake detectors
    pub fn inject(&self, provider: Arc<dyn InjectedProvider>) {
        debug!(provider = %provider.name(), "provider injected");
        match self.provider.write() {
            Ok(mut guard) => *guard = Some(provider),
            Err(poisoned) => *poisoned.into_inner() = Some(provider),
        }
        self.injected.notify_waiters();
    }

    /// The currently injected provider, if any
    pub fn current(&self) -> Option<Arc<dyn InjectedProvider>> {
        match self.provider.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl std::fmt::Debug for ProviderSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSlot")
            .field("provider", &self.current().map(|p| p.name()))
            .finish()
    }
}

/// Detection behaviour
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// How long to wait for a late injection
    pub timeout: Duration,
    /// Only accept providers that identify as MetaMask
    pub must_be_metamask: bool,
    /// Suppress the warning logged when a provider is rejected
    pub silent: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DETECT_TIMEOUT,
            must_be_metamask: false,
            silent: false,
        }
    }
}

/// Find an injected provider, waiting up to `options.timeout` for one to appear
///
/// Returns `None` when nothing acceptable was injected in time.
pub async fn detect_provider(
    slot: &ProviderSlot,
    options: &DetectOptions,
) -> Option<Arc<dyn InjectedProvider>> {
    // Register interest before probing so an injection between the probe and
    // the wait is not missed.
    let injected = slot.injected.notified();
    tokio::pin!(injected);
    injected.as_mut().enable();

    let provider = match slot.current() {
        Some(provider) => provider,
        None => {
            let timeout_ms = options.timeout.as_millis() as u64;
            debug!(timeout_ms, "waiting for provider injection");
            match tokio::time::timeout(options.timeout, injected).await {
                Ok(()) => slot.current()?,
                Err(_) => {
                    debug!("no provider injected before timeout");
                    return None;
                }
            }
        }
    };

    accept(provider, options)
}

fn accept(
    provider: Arc<dyn InjectedProvider>,
    options: &DetectOptions,
) -> Option<Arc<dyn InjectedProvider>> {
    if options.must_be_metamask && !provider.is_metamask() {
        if !options.silent {
            warn!(provider = %provider.name(), "non-MetaMask provider detected");
        }
        return None;
    }
    debug!(provider = %provider.name(), "provider detected");
    Some(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderRpcError;
    use serde_json::Value;

    struct Stub {
        metamask: bool,
    }

    #[async_trait::async_trait]
    impl InjectedProvider for Stub {
        async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderRpcError> {
            Err(ProviderRpcError::unsupported_method(method))
        }

        fn is_metamask(&self) -> bool {
            self.metamask
        }
    }

    fn fast() -> DetectOptions {
        DetectOptions {
            timeout: Duration::from_millis(50),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_present_provider_returned_immediately() {
        let slot = ProviderSlot::with_provider(Arc::new(Stub { metamask: false }));
        assert!(detect_provider(&slot, &fast()).await.is_some());
    }

    #[tokio::test]
    async fn test_empty_slot_times_out() {
        let slot = ProviderSlot::new();
        assert!(detect_provider(&slot, &fast()).await.is_none());
    }

    #[tokio::test]
    async fn test_late_injection_is_picked_up() {
        let slot = Arc::new(ProviderSlot::new());
        let options = DetectOptions {
            timeout: Duration::from_secs(5),
            ..Default::default()
        };

        let injector = {
            let slot = slot.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                slot.inject(Arc::new(Stub { metamask: true }));
            })
        };

        let found = detect_provider(&slot, &options).await;
        injector.await.unwrap();
        assert!(found.is_some_and(|p| p.is_metamask()));
    }

    #[tokio::test]
    async fn test_must_be_metamask() {
        let slot = ProviderSlot::with_provider(Arc::new(Stub { metamask: false }));
        let options = DetectOptions {
            must_be_metamask: true,
            silent: true,
            ..fast()
        };
        assert!(detect_provider(&slot, &options).await.is_none());

        slot.inject(Arc::new(Stub { metamask: true }));
        assert!(detect_provider(&slot, &options).await.is_some());
    }
}
