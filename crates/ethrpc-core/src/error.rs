//! Error types for the client, transport and codec layers.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors from the hex codec (`0x`-prefixed quantity/data grammar).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input does not start with the lowercase `0x` prefix.
    #[error("missing 0x prefix in {0:?}")]
    MissingPrefix(String),

    /// A quantity with no digits after the prefix (`0x`).
    #[error("quantity has no hex digits")]
    EmptyQuantity,

    /// A non-hex character was found after the prefix.
    #[error("invalid hex digit in {0:?}")]
    InvalidDigit(String),

    /// Data hex must have an even number of digits.
    #[error("odd-length hex data ({len} digits)")]
    OddLength { len: usize },

    /// Quantity does not fit in 256 bits.
    #[error("quantity overflows 256 bits: {0:?}")]
    Overflow(String),

    /// Address/hash string has the wrong length.
    #[error("expected {expected} hex digits, got {got}")]
    BadLength { expected: usize, got: usize },
}

/// Network-layer failures, classified by kind.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not establish a connection to the endpoint.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Request exceeded the configured overall timeout.
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The caller's cancellation signal fired while the request was in flight.
    #[error("request canceled")]
    Canceled,

    /// Any other I/O failure while sending or receiving.
    #[error("I/O error: {0}")]
    Io(String),

    /// The endpoint answered with a non-2xx HTTP status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

/// Violations of the JSON-RPC 2.0 envelope contract.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Response body could not be parsed as JSON.
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    /// Response carried both `result` and `error`.
    #[error("response contains both result and error")]
    BothResultAndError,

    /// Response carried neither `result` nor `error`.
    #[error("response contains neither result nor error")]
    MissingResultAndError,

    /// Response id does not echo the request id.
    #[error("response id {got} does not match request id {expected}")]
    IdMismatch { expected: u64, got: String },

    /// Envelope field had an unexpected JSON type.
    #[error("unexpected type for {field}: {detail}")]
    UnexpectedType { field: &'static str, detail: String },
}

/// The unified error surfaced by every public client operation.
///
/// Null results for lookup methods are `Ok(None)`, never an error.
/// No variant is ever retried internally.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid endpoint URL or timeout, rejected at construction time.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Malformed hex input or unrepresentable value.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Network-layer failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// JSON-RPC envelope violation.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A field of a typed response could not be decoded.
    #[error("failed to decode `{field}`: {reason}")]
    Decode { field: String, reason: String },

    /// Error object returned by the node, surfaced verbatim.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),
}

impl ClientError {
    /// Shorthand for a [`ClientError::Decode`] with a labeled field.
    pub fn decode(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the node error if this is an RPC-level failure.
    pub fn as_rpc(&self) -> Option<&JsonRpcError> {
        match self {
            Self::Rpc(e) => Some(e),
            _ => None,
        }
    }
}
