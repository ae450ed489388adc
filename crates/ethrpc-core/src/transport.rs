//! The `RpcTransport` trait — the seam between domain operations and the wire.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ClientError, ProtocolError};
use crate::request::{JsonRpcRequest, JsonRpcResponse, RpcId};

/// An async JSON-RPC 2.0 transport bound to a single endpoint.
///
/// Implementations must be `Send + Sync`; the trait is object-safe and is
/// normally consumed as `Arc<dyn RpcTransport>`. Other than the request-id
/// counter, a transport holds no mutable state.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the parsed envelope.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, ClientError>;

    /// Allocate the next request id. Ids are strictly increasing over the
    /// lifetime of a transport instance and never reused.
    fn next_id(&self) -> u64;

    /// The endpoint this transport talks to.
    fn url(&self) -> &str;

    /// Call `method` with `params`, unwrap the envelope and return the raw
    /// `result` value.
    ///
    /// The response id must echo the request id; a mismatch is a
    /// [`ProtocolError::IdMismatch`].
    async fn call_raw(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        let id = self.next_id();
        let resp = self.send(JsonRpcRequest::new(id, method, params)).await?;
        if resp.id != RpcId::Number(id) {
            return Err(ProtocolError::IdMismatch {
                expected: id,
                got: resp.id.to_string(),
            }
            .into());
        }
        resp.into_result()
    }

    /// Send several requests.
    ///
    /// The default sends them one by one over [`RpcTransport::send`].
    /// Wire-level JSON-RPC batching is deliberately left to implementations;
    /// id assignment and per-request demux already live here, so an override
    /// only has to frame the array.
    async fn send_batch(
        &self,
        reqs: Vec<JsonRpcRequest>,
    ) -> Result<Vec<JsonRpcResponse>, ClientError> {
        let mut responses = Vec::with_capacity(reqs.len());
        for req in reqs {
            responses.push(self.send(req).await?);
        }
        Ok(responses)
    }
}
