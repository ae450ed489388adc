//! Ethereum wire types.
//!
//! Field names follow the node's JSON-RPC payload contracts (camelCase);
//! absent optionals are omitted on emission, extra fields are tolerated on
//! ingest. Quantities and byte strings ride through the hex codec so a bad
//! field fails with the codec's reason instead of a silent zero.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ethrpc_core::error::CodecError;
use ethrpc_core::hex::{self, data, data_opt, quantity, quantity_opt};
use ethrpc_core::U256;

/// A 20-byte account address, held as its lowercase wire form.
///
/// Any digit case is accepted on construction and normalized; no EIP-55
/// checksum is applied or verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn new(s: &str) -> Result<Self, CodecError> {
        hex::normalize_address(s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self, CodecError> {
        Self::new(&s)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> String {
        a.0
    }
}

impl FromStr for Address {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, CodecError> {
        Self::new(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 32-byte hash (transaction, block or state root), lowercase wire form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash(String);

impl Hash {
    pub fn new(s: &str) -> Result<Self, CodecError> {
        hex::normalize_hash(s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Hash {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self, CodecError> {
        Self::new(&s)
    }
}

impl From<Hash> for String {
    fn from(h: Hash) -> String {
        h.0
    }
}

impl FromStr for Hash {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, CodecError> {
        Self::new(s)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Block selector for read operations: a named tag or a block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Earliest,
    Pending,
    Number(U256),
}

impl BlockTag {
    /// The JSON parameter form: the tag string or a Quantity.
    pub fn to_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Earliest => f.write_str("earliest"),
            Self::Pending => f.write_str("pending"),
            Self::Number(n) => f.write_str(&hex::encode_quantity(*n)),
        }
    }
}

impl From<u64> for BlockTag {
    fn from(n: u64) -> Self {
        Self::Number(U256::from(n))
    }
}

impl FromStr for BlockTag {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, CodecError> {
        match s {
            "latest" => Ok(Self::Latest),
            "earliest" => Ok(Self::Earliest),
            "pending" => Ok(Self::Pending),
            other => hex::decode_quantity(other).map(Self::Number),
        }
    }
}

/// A transaction, both as submitted to `eth_sendTransaction` and as
/// returned by `eth_getTransactionByHash`.
///
/// Every field is optional on the wire; `hash`, `input` and the block
/// position fields only appear on retrieval. Node-signed submission
/// requires `from`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, with = "data_opt", skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Hash>,
    #[serde(default, with = "data_opt", skip_serializing_if = "Option::is_none")]
    pub input: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<Hash>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U256>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub transaction_index: Option<U256>,
}

impl Transaction {
    /// A plain value transfer signed by the node (`from` must be unlocked).
    pub fn transfer(from: Address, to: Address, value_wei: U256) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            value: Some(value_wei),
            ..Default::default()
        }
    }
}

/// Read-only invocation shape for `eth_call`; all fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, with = "data_opt", skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

impl TransactionCall {
    /// A call to `to` with the given ABI-encoded payload.
    pub fn to_contract(to: Address, data: Vec<u8>) -> Self {
        Self {
            to: Some(to),
            data: Some(data),
            ..Default::default()
        }
    }
}

/// A log entry emitted during transaction execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: Address,
    #[serde(default)]
    pub topics: Vec<Hash>,
    #[serde(with = "data")]
    pub data: Vec<u8>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<Hash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<Hash>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub transaction_index: Option<U256>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub log_index: Option<U256>,
}

/// Post-mining record of a transaction's execution outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: Hash,
    #[serde(with = "quantity")]
    pub transaction_index: U256,
    pub block_hash: Hash,
    #[serde(with = "quantity")]
    pub block_number: U256,
    #[serde(with = "quantity")]
    pub cumulative_gas_used: U256,
    #[serde(with = "quantity")]
    pub gas_used: U256,
    /// Created contract address; null unless the transaction was a creation.
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub logs: Vec<Log>,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub status: Option<U256>,
}

/// The `transactions` field of a block: hashes, or full objects when the
/// block was requested with `full_objects = true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransactions {
    Hashes(Vec<Hash>),
    Full(Vec<Transaction>),
}

impl Default for BlockTransactions {
    fn default() -> Self {
        Self::Hashes(Vec::new())
    }
}

impl BlockTransactions {
    pub fn len(&self) -> usize {
        match self {
            Self::Hashes(h) => h.len(),
            Self::Full(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A block as returned by `eth_getBlockByNumber`.
///
/// Fields a node reports as null for pending blocks are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub number: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Hash>,
    pub parent_hash: Hash,
    #[serde(default, with = "data_opt", skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Vec<u8>>,
    pub sha3_uncles: Hash,
    #[serde(default, with = "data_opt", skip_serializing_if = "Option::is_none")]
    pub logs_bloom: Option<Vec<u8>>,
    pub transactions_root: Hash,
    pub state_root: Hash,
    pub receipts_root: Hash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miner: Option<Address>,
    #[serde(with = "quantity")]
    pub difficulty: U256,
    #[serde(default, with = "quantity_opt", skip_serializing_if = "Option::is_none")]
    pub total_difficulty: Option<U256>,
    #[serde(with = "data")]
    pub extra_data: Vec<u8>,
    #[serde(with = "quantity")]
    pub size: U256,
    #[serde(with = "quantity")]
    pub gas_limit: U256,
    #[serde(with = "quantity")]
    pub gas_used: U256,
    #[serde(with = "quantity")]
    pub timestamp: U256,
    #[serde(default)]
    pub transactions: BlockTransactions,
    #[serde(default)]
    pub uncles: Vec<Hash>,
}

/// One compiled contract from `eth_compileSolidity`.
///
/// `info` carries the compiler's metadata (ABI definition included) as a
/// free-form value; the client does not interpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledContract {
    #[serde(with = "data")]
    pub code: Vec<u8>,
    #[serde(default)]
    pub info: Value,
}

/// Compile output: contract name → compiled artifact.
pub type CompileOutput = BTreeMap<String, CompiledContract>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn address_accepts_any_case_and_normalizes() {
        let a: Address = "0x52908400098527886E0F7030069857D2E4169EE7".parse().unwrap();
        assert_eq!(a.as_str(), "0x52908400098527886e0f7030069857d2e4169ee7");
        assert!("0x1234".parse::<Address>().is_err());
    }

    #[test]
    fn address_deserializes_with_validation() {
        let a: Address = serde_json::from_value(json!("0xABCDEF0123456789abcdef0123456789ABCDEF01")).unwrap();
        assert_eq!(a.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
        assert!(serde_json::from_value::<Address>(json!("0xnot-an-address")).is_err());
    }

    #[test]
    fn block_tag_parameter_forms() {
        assert_eq!(BlockTag::Latest.to_value(), json!("latest"));
        assert_eq!(BlockTag::Pending.to_value(), json!("pending"));
        assert_eq!(BlockTag::from(255u64).to_value(), json!("0xff"));
        assert_eq!("pending".parse::<BlockTag>().unwrap(), BlockTag::Pending);
        assert_eq!(
            "0x2a".parse::<BlockTag>().unwrap(),
            BlockTag::Number(U256::from(42))
        );
        assert!("newest".parse::<BlockTag>().is_err());
        assert_eq!(BlockTag::default(), BlockTag::Latest);
    }

    #[test]
    fn transaction_emission_omits_absent_fields() {
        let from: Address = "0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b".parse().unwrap();
        let to: Address = "0x5df9b87991262f6ba471f09758cde1c0fc1de734".parse().unwrap();
        let tx = Transaction::transfer(from, to, U256::from(1000));

        let value = serde_json::to_value(&tx).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["from"], json!("0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b"));
        assert_eq!(obj["value"], json!("0x3e8"));
        assert!(!obj.contains_key("gasPrice"));
        assert!(!obj.contains_key("nonce"));
    }

    #[test]
    fn transaction_field_names_are_camel_case() {
        let tx = Transaction {
            gas_price: Some(U256::from(20)),
            ..Default::default()
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value, json!({"gasPrice": "0x14"}));
    }

    #[test]
    fn receipt_decodes_with_null_contract_address() {
        let receipt: TransactionReceipt = serde_json::from_value(json!({
            "transactionHash": format!("0x{}", "11".repeat(32)),
            "transactionIndex": "0x1",
            "blockHash": format!("0x{}", "22".repeat(32)),
            "blockNumber": "0xb",
            "cumulativeGasUsed": "0x33bc",
            "gasUsed": "0x4dc",
            "contractAddress": null,
            "logs": [],
            "status": "0x1",
            "someFutureField": "ignored"
        }))
        .unwrap();
        assert_eq!(receipt.block_number, U256::from(11));
        assert!(receipt.contract_address.is_none());
        assert_eq!(receipt.status, Some(U256::from(1)));
    }

    #[test]
    fn receipt_rejects_malformed_quantity() {
        let err = serde_json::from_value::<TransactionReceipt>(json!({
            "transactionHash": format!("0x{}", "11".repeat(32)),
            "transactionIndex": "not-hex",
            "blockHash": format!("0x{}", "22".repeat(32)),
            "blockNumber": "0xb",
            "cumulativeGasUsed": "0x33bc",
            "gasUsed": "0x4dc",
            "contractAddress": null,
            "logs": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("0x"));
    }

    fn block_json(transactions: Value) -> Value {
        json!({
            "number": "0x1b4",
            "hash": format!("0x{}", "aa".repeat(32)),
            "parentHash": format!("0x{}", "bb".repeat(32)),
            "nonce": "0x0000000000000042",
            "sha3Uncles": format!("0x{}", "cc".repeat(32)),
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionsRoot": format!("0x{}", "dd".repeat(32)),
            "stateRoot": format!("0x{}", "ee".repeat(32)),
            "receiptsRoot": format!("0x{}", "ff".repeat(32)),
            "miner": "0x4e65fda2159562a496f9f3522f89122a3088497a",
            "difficulty": "0x27f07",
            "totalDifficulty": "0x27f07",
            "extraData": "0x",
            "size": "0x27f07",
            "gasLimit": "0x1c9c380",
            "gasUsed": "0x9f759",
            "timestamp": "0x54e34e8e",
            "transactions": transactions,
            "uncles": []
        })
    }

    #[test]
    fn block_with_transaction_hashes() {
        let hash = format!("0x{}", "12".repeat(32));
        let block: Block = serde_json::from_value(block_json(json!([hash]))).unwrap();
        assert_eq!(block.gas_limit, U256::from(30_000_000));
        match block.transactions {
            BlockTransactions::Hashes(hashes) => assert_eq!(hashes.len(), 1),
            other => panic!("expected hashes, got {other:?}"),
        }
    }

    #[test]
    fn block_with_full_transactions() {
        let tx = json!({
            "hash": format!("0x{}", "12".repeat(32)),
            "from": "0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b",
            "value": "0x0",
            "input": "0x"
        });
        let block: Block = serde_json::from_value(block_json(json!([tx]))).unwrap();
        match block.transactions {
            BlockTransactions::Full(txs) => {
                assert_eq!(txs.len(), 1);
                assert!(txs[0].hash.is_some());
            }
            other => panic!("expected full objects, got {other:?}"),
        }
    }

    #[test]
    fn compile_output_shape() {
        let out: CompileOutput = serde_json::from_value(json!({
            "Multiply7": {
                "code": "0x6060",
                "info": {
                    "abiDefinition": [{"name": "multiply", "type": "function"}],
                    "language": "Solidity"
                }
            }
        }))
        .unwrap();
        let contract = &out["Multiply7"];
        assert_eq!(contract.code, vec![0x60, 0x60]);
        assert!(contract.info["abiDefinition"].is_array());
    }
}
