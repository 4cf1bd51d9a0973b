//! Alloy transport that routes JSON-RPC through an injected provider
//!
//! Every request packet is unpacked into `(method, params)` calls on the
//! provider and the answers are reassembled into JSON-RPC responses. Provider
//! errors become JSON-RPC error payloads, so alloy reports them as
//! `ErrorResp` with the original code and message.

use std::sync::Arc;
use std::task;

use alloy::rpc::json_rpc::{RequestPacket, Response, ResponsePacket, SerializedRequest};
use alloy::transports::{TransportError, TransportFut, TransportResult};
use serde_json::{json, Value};
use tower::Service;
use tracing::{debug, debug_span, trace, Instrument};

use crate::domain::InjectedProvider;

/// JSON-RPC transport backed by an [`InjectedProvider`]
#[derive(Clone)]
pub struct Eip1193Transport {
    provider: Arc<dyn InjectedProvider>,
}

impl Eip1193Transport {
    pub fn new(provider: Arc<dyn InjectedProvider>) -> Self {
        Self { provider }
    }

    async fn dispatch(self, packet: RequestPacket) -> TransportResult<ResponsePacket> {
        match packet {
            RequestPacket::Single(req) => Ok(ResponsePacket::Single(self.forward(req).await?)),
            RequestPacket::Batch(reqs) => {
                let mut responses = Vec::with_capacity(reqs.len());
                for req in reqs {
                    responses.push(self.forward(req).await?);
                }
                Ok(ResponsePacket::Batch(responses))
            }
        }
    }

    async fn forward(&self, req: SerializedRequest) -> TransportResult<Response> {
        let id = serde_json::to_value(req.id()).map_err(TransportError::ser_err)?;
        let params = match req.params() {
            Some(raw) => serde_json::from_str::<Value>(raw.get()).map_err(TransportError::ser_err)?,
            None => Value::Null,
        };

        debug!(method = req.method(), "forwarding request to provider");
        trace!(params = %params, "request params");

        let body = match self.provider.request(req.method(), params).await {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(err) => {
                debug!(code = err.code, message = %err.message, "provider returned error");
                json!({ "jsonrpc": "2.0", "id": id, "error": err })
            }
        };

        let text = body.to_string();
        serde_json::from_str(&text).map_err(|err| TransportError::deser_err(err, text.as_str()))
    }
}

impl std::fmt::Debug for Eip1193Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Eip1193Transport")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl Service<RequestPacket> for Eip1193Transport {
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    #[inline]
    fn poll_ready(&mut self, _cx: &mut task::Context<'_>) -> task::Poll<Result<(), Self::Error>> {
        // The provider queues requests itself.
        task::Poll::Ready(Ok(()))
    }

    #[inline]
    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let this = self.clone();
        let span = debug_span!("Eip1193Transport", provider = %this.provider.name());
        Box::pin(this.dispatch(req).instrument(span))
    }
}
