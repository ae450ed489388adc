//! Domain-level Ethereum operations over an [`RpcTransport`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use ethrpc_core::error::ClientError;
use ethrpc_core::hex;
use ethrpc_core::transport::RpcTransport;
use ethrpc_core::U256;
use ethrpc_http::{HttpClientConfig, HttpTransport};

use crate::types::{
    Address, Block, BlockTag, CompileOutput, Hash, Transaction, TransactionCall,
    TransactionReceipt,
};

/// The JSON-RPC method names this client invokes, in one place.
///
/// Each operation below is a static entry of (method, param shape, result
/// decoder); there is no reflective dispatch.
pub mod methods {
    pub const COINBASE: &str = "eth_coinbase";
    pub const ACCOUNTS: &str = "eth_accounts";
    pub const GET_TRANSACTION_COUNT: &str = "eth_getTransactionCount";
    pub const GET_BALANCE: &str = "eth_getBalance";
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";
    pub const GET_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";
    pub const GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
    pub const CALL: &str = "eth_call";
    pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
    pub const COMPILE_SOLIDITY: &str = "eth_compileSolidity";
    pub const UNLOCK_ACCOUNT: &str = "personal_unlockAccount";
}

/// Typed client for an Ethereum node's JSON-RPC interface.
///
/// Hex↔integer conversion happens at this boundary; callers work with
/// [`U256`] and byte slices, never wire hex (contract call data and raw
/// signed transactions stay opaque byte strings by design).
///
/// The client is `Clone` and safe for concurrent use; it holds no state
/// beyond the shared transport.
#[derive(Clone)]
pub struct EthClient {
    transport: Arc<dyn RpcTransport>,
}

impl EthClient {
    /// Build a client over an existing transport.
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Build a client for an HTTP endpoint with default configuration.
    pub fn connect(url: impl AsRef<str>) -> Result<Self, ClientError> {
        Self::connect_with(url, HttpClientConfig::default())
    }

    /// Build a client for an HTTP endpoint with the given configuration.
    pub fn connect_with(
        url: impl AsRef<str>,
        config: HttpClientConfig,
    ) -> Result<Self, ClientError> {
        Ok(Self::new(Arc::new(HttpTransport::new(url, config)?)))
    }

    /// Client for a node on `http://localhost:8545/`.
    pub fn localhost() -> Result<Self, ClientError> {
        Ok(Self::new(Arc::new(HttpTransport::localhost()?)))
    }

    /// The endpoint this client talks to.
    pub fn url(&self) -> &str {
        self.transport.url()
    }

    /// The address receiving this node's block rewards.
    pub async fn coinbase(&self) -> Result<Address, ClientError> {
        let result = self.transport.call_raw(methods::COINBASE, vec![]).await?;
        typed("coinbase", result)
    }

    /// Accounts managed by the node.
    pub async fn accounts(&self) -> Result<Vec<Address>, ClientError> {
        let result = self.transport.call_raw(methods::ACCOUNTS, vec![]).await?;
        typed("accounts", result)
    }

    /// Transaction count of `address` at the latest block.
    pub async fn nonce(&self, address: &Address) -> Result<U256, ClientError> {
        self.nonce_at(address, BlockTag::Latest).await
    }

    /// Transaction count of `address` at the given block.
    pub async fn nonce_at(&self, address: &Address, tag: BlockTag) -> Result<U256, ClientError> {
        let params = vec![Value::String(address.to_string()), tag.to_value()];
        let result = self
            .transport
            .call_raw(methods::GET_TRANSACTION_COUNT, params)
            .await?;
        quantity_result("transactionCount", result)
    }

    /// Balance of `address` in wei at the latest block.
    pub async fn balance(&self, address: &Address) -> Result<U256, ClientError> {
        self.balance_at(address, BlockTag::Latest).await
    }

    /// Balance of `address` in wei at the given block.
    pub async fn balance_at(&self, address: &Address, tag: BlockTag) -> Result<U256, ClientError> {
        let params = vec![Value::String(address.to_string()), tag.to_value()];
        let result = self.transport.call_raw(methods::GET_BALANCE, params).await?;
        quantity_result("balance", result)
    }

    /// Submit a transaction for the node to sign and broadcast.
    ///
    /// `from` must name an account the node has unlocked; an unlock failure
    /// comes back as the node's own RPC error.
    pub async fn send_transaction(&self, tx: &Transaction) -> Result<Hash, ClientError> {
        if tx.from.is_none() {
            return Err(ClientError::Config(
                "eth_sendTransaction requires `from`".into(),
            ));
        }
        let params = vec![to_param("transaction", tx)?];
        let result = self
            .transport
            .call_raw(methods::SEND_TRANSACTION, params)
            .await?;
        typed("transactionHash", result)
    }

    /// Broadcast an already-signed transaction.
    pub async fn send_raw_transaction(&self, signed: &[u8]) -> Result<Hash, ClientError> {
        let params = vec![Value::String(hex::encode_data(signed))];
        let result = self
            .transport
            .call_raw(methods::SEND_RAW_TRANSACTION, params)
            .await?;
        typed("transactionHash", result)
    }

    /// Broadcast an already-signed transaction given as a hex string.
    ///
    /// The input is validated through the codec and re-emitted in canonical
    /// form.
    pub async fn send_raw_transaction_hex(&self, signed: &str) -> Result<Hash, ClientError> {
        let bytes = hex::decode_data(signed)?;
        self.send_raw_transaction(&bytes).await
    }

    /// Look up a transaction by hash; `None` if the node does not know it.
    pub async fn transaction_by_hash(
        &self,
        hash: &Hash,
    ) -> Result<Option<Transaction>, ClientError> {
        let params = vec![Value::String(hash.to_string())];
        let result = self
            .transport
            .call_raw(methods::GET_TRANSACTION_BY_HASH, params)
            .await?;
        nullable("transaction", result)
    }

    /// Receipt of a mined transaction; `None` while it is still pending.
    pub async fn transaction_receipt(
        &self,
        hash: &Hash,
    ) -> Result<Option<TransactionReceipt>, ClientError> {
        let params = vec![Value::String(hash.to_string())];
        let result = self
            .transport
            .call_raw(methods::GET_TRANSACTION_RECEIPT, params)
            .await?;
        nullable("receipt", result)
    }

    /// Execute a read-only call against the latest block.
    pub async fn call_method(&self, call: &TransactionCall) -> Result<Vec<u8>, ClientError> {
        self.call_method_at(call, BlockTag::Latest).await
    }

    /// Execute a read-only call against the given block.
    pub async fn call_method_at(
        &self,
        call: &TransactionCall,
        tag: BlockTag,
    ) -> Result<Vec<u8>, ClientError> {
        let params = vec![to_param("call", call)?, tag.to_value()];
        let result = self.transport.call_raw(methods::CALL, params).await?;
        data_result("returnData", result)
    }

    /// Fetch a block; `None` if no block matches the selector.
    ///
    /// With `full_objects` the block carries complete transaction records,
    /// otherwise only their hashes; see
    /// [`BlockTransactions`](crate::types::BlockTransactions).
    pub async fn block_by_number(
        &self,
        tag: BlockTag,
        full_objects: bool,
    ) -> Result<Option<Block>, ClientError> {
        let params = vec![tag.to_value(), Value::Bool(full_objects)];
        let result = self
            .transport
            .call_raw(methods::GET_BLOCK_BY_NUMBER, params)
            .await?;
        nullable("block", result)
    }

    /// Gas limit of the latest block, `None` if the node returned no block.
    pub async fn latest_block_gas_limit(&self) -> Result<Option<U256>, ClientError> {
        let block = self.block_by_number(BlockTag::Latest, true).await?;
        Ok(block.map(|b| b.gas_limit))
    }

    /// Forward Solidity source to the node's compiler.
    ///
    /// Nodes without compiler support answer with an RPC error, which
    /// surfaces unchanged.
    pub async fn compile_solidity(&self, source: &str) -> Result<CompileOutput, ClientError> {
        let params = vec![Value::String(source.to_string())];
        let result = self
            .transport
            .call_raw(methods::COMPILE_SOLIDITY, params)
            .await?;
        typed("compileOutput", result)
    }

    /// Unlock `address` on the node.
    ///
    /// Node-dependent; the boolean is passed through without interpretation.
    pub async fn unlock_account(
        &self,
        address: &Address,
        passphrase: &str,
    ) -> Result<bool, ClientError> {
        let params = vec![
            Value::String(address.to_string()),
            Value::String(passphrase.to_string()),
        ];
        let result = self
            .transport
            .call_raw(methods::UNLOCK_ACCOUNT, params)
            .await?;
        result
            .as_bool()
            .ok_or_else(|| ClientError::decode("unlocked", "expected a boolean"))
    }

    /// Unlock `from` and, only on success, submit `tx` from it.
    ///
    /// A declined unlock returns `None` without attempting submission; any
    /// failure in either call propagates.
    pub async fn unlock_and_send(
        &self,
        from: &Address,
        passphrase: &str,
        tx: &Transaction,
    ) -> Result<Option<Hash>, ClientError> {
        if !self.unlock_account(from, passphrase).await? {
            return Ok(None);
        }
        let tx = Transaction {
            from: Some(from.clone()),
            ..tx.clone()
        };
        self.send_transaction(&tx).await.map(Some)
    }
}

fn to_param<T: serde::Serialize>(field: &'static str, value: &T) -> Result<Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ClientError::decode(field, e))
}

fn typed<T: DeserializeOwned>(field: &'static str, result: Value) -> Result<T, ClientError> {
    serde_json::from_value(result).map_err(|e| ClientError::decode(field, e))
}

fn nullable<T: DeserializeOwned>(
    field: &'static str,
    result: Value,
) -> Result<Option<T>, ClientError> {
    match result {
        Value::Null => Ok(None),
        other => typed(field, other).map(Some),
    }
}

fn quantity_result(field: &'static str, result: Value) -> Result<U256, ClientError> {
    let s = result
        .as_str()
        .ok_or_else(|| ClientError::decode(field, "expected a hex quantity string"))?;
    hex::decode_quantity(s).map_err(|e| ClientError::decode(field, e))
}

fn data_result(field: &'static str, result: Value) -> Result<Vec<u8>, ClientError> {
    let s = result
        .as_str()
        .ok_or_else(|| ClientError::decode(field, "expected a hex data string"))?;
    hex::decode_data(s).map_err(|e| ClientError::decode(field, e))
}
