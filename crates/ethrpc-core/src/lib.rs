//! ethrpc-core — JSON-RPC 2.0 envelope, transport trait and hex codec.
//!
//! # Overview
//!
//! ethrpc is a typed client for an Ethereum node's JSON-RPC 2.0 HTTP
//! interface. The core crate defines the pieces everything else builds on:
//!
//! - [`RpcTransport`] — the async trait every transport implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`] — wire envelope types
//! - [`hex`] — the `0x` quantity/data codec and serde adapters
//! - [`ClientError`] — the unified error taxonomy
//!
//! The HTTP implementation lives in `ethrpc-http`; the Ethereum wire types
//! and domain operations live in `ethrpc-client`.

pub mod error;
pub mod hex;
pub mod request;
pub mod transport;

pub use error::{ClientError, CodecError, ProtocolError, TransportError};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use transport::RpcTransport;

/// 256-bit unsigned integer used for every wire Quantity.
pub use alloy_primitives::U256;
