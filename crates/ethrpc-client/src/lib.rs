//! ethrpc-client — typed Ethereum operations over the ethrpc transport.
//!
//! [`EthClient`] wraps an `Arc<dyn RpcTransport>` and exposes the node's
//! JSON-RPC surface as typed async operations: account and balance reads,
//! transaction submission, block and receipt lookup, read-only contract
//! calls and Solidity compile forwarding.
//!
//! # Quick start
//! ```rust,no_run
//! use ethrpc_client::{BlockTag, EthClient};
//!
//! # async fn demo() -> Result<(), ethrpc_client::ClientError> {
//! let client = EthClient::connect("http://localhost:8545/")?;
//! let coinbase = client.coinbase().await?;
//! let balance = client.balance_at(&coinbase, BlockTag::Latest).await?;
//! println!("{coinbase}: {balance} wei");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::EthClient;
pub use types::{
    Address, Block, BlockTag, BlockTransactions, CompileOutput, CompiledContract, Hash, Log,
    Transaction, TransactionCall, TransactionReceipt,
};

pub use ethrpc_core::{ClientError, U256};
pub use ethrpc_http::{HttpClientConfig, HttpTransport};
