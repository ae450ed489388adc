//! ethrpc-http — HTTP JSON-RPC transport for ethrpc.
//!
//! [`HttpTransport`] implements `ethrpc_core::RpcTransport` over a single
//! HTTP(S) endpoint using a pooled `reqwest` client: one POST per request,
//! `application/json` both ways, a configurable overall timeout and a
//! caller-supplied cancellation token. It performs no retries.

pub mod client;

pub use client::{HttpClientConfig, HttpTransport, DEFAULT_ENDPOINT};
