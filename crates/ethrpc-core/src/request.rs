//! JSON-RPC 2.0 wire types.
//!
//! The response type keeps explicit `"result": null` distinguishable from
//! an absent `result` key, because lookup methods use null as a legal
//! "not found" answer while a missing key is an envelope violation.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{ClientError, ProtocolError};

/// JSON-RPC request ID — string, number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    Null,
}

impl std::fmt::Display for RpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: RpcId,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request.
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: RpcId::Number(id),
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

/// A JSON-RPC 2.0 response.
///
/// `result: Some(Value::Null)` means the node answered `"result": null`;
/// `result: None` means the key was absent.
#[derive(Debug, Clone)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RpcId,
    pub result: Option<Value>,
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a successful response (used by tests and mock transports).
    pub fn result(id: RpcId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response.
    pub fn error(id: RpcId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Parse a response from an already-decoded JSON value.
    ///
    /// Key presence is checked on the raw object, which is the only way to
    /// tell `"result": null` apart from no `result` at all.
    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        let obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(ProtocolError::UnexpectedType {
                    field: "response",
                    detail: format!("expected object, got {other}"),
                }
                .into())
            }
        };

        let jsonrpc = match obj.get("jsonrpc") {
            Some(Value::String(v)) => v.clone(),
            _ => "2.0".into(),
        };
        let id = obj
            .get("id")
            .cloned()
            .map(serde_json::from_value::<RpcId>)
            .transpose()
            .map_err(|e| ProtocolError::UnexpectedType {
                field: "id",
                detail: e.to_string(),
            })?
            .unwrap_or(RpcId::Null);
        let result = obj.get("result").cloned();
        let error = obj
            .get("error")
            .cloned()
            .map(serde_json::from_value::<JsonRpcError>)
            .transpose()
            .map_err(|e| ProtocolError::UnexpectedType {
                field: "error",
                detail: e.to_string(),
            })?;

        Ok(Self {
            jsonrpc,
            id,
            result,
            error,
        })
    }

    /// Enforce the envelope contract and unwrap the payload.
    ///
    /// Exactly one of `result` / `error` must be present; anything else is
    /// a [`ProtocolError`]. A node error becomes [`ClientError::Rpc`]
    /// verbatim.
    pub fn into_result(self) -> Result<Value, ClientError> {
        match (self.result, self.error) {
            (Some(_), Some(_)) => Err(ProtocolError::BothResultAndError.into()),
            (None, None) => Err(ProtocolError::MissingResultAndError.into()),
            (None, Some(e)) => Err(ClientError::Rpc(e)),
            (Some(v), None) => Ok(v),
        }
    }
}

impl Serialize for JsonRpcResponse {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let fields = 2 + self.result.is_some() as usize + self.error.is_some() as usize;
        let mut s = ser.serialize_struct("JsonRpcResponse", fields)?;
        s.serialize_field("jsonrpc", &self.jsonrpc)?;
        s.serialize_field("id", &self.id)?;
        if let Some(result) = &self.result {
            s.serialize_field("result", result)?;
        }
        if let Some(error) = &self.error {
            s.serialize_field("error", error)?;
        }
        s.end()
    }
}

impl<'de> Deserialize<'de> for JsonRpcResponse {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(de)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}
