//! The wallet provider boundary: account access, contract writes and
//! contract event subscriptions against the prediction oracle ABI.

#[cfg(feature = "eth")]
pub mod eth;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(feature = "eth")]
pub mod rules;

pub use alloy_primitives::{Address, B256};

use std::fmt;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

pub type EventStream = Pin<Box<dyn Stream<Item = Result<ContractEvent, WalletError>> + Send>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
	#[error("wallet provider is not reachable: {0}")]
	Unavailable(String),
	#[error("request rejected by the account holder: {0}")]
	Rejected(String),
	#[error("transaction fee {0} wei exceeds the configured limit of {1} wei")]
	GasLimitExceeded(u128, u128),
	#[error("insufficient funds: {0}")]
	InsufficientFunds(String),
	#[error("transaction underpriced: {0}")]
	UnderPriced(String),
	#[error("transport error: {0}")]
	Transport(String),
	#[error("transaction execution failed: {0}")]
	Execution(String),
	#[error("event subscription failed: {0}")]
	Subscription(String),
}

/// A write entry point of the oracle contract with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
	RequestPrediction { content1: String, content2: String },
	StoreCid { cid: String },
}

impl ContractCall {
	pub fn function_name(&self) -> &'static str {
		match self {
			ContractCall::RequestPrediction { .. } => "requestPrediction",
			ContractCall::StoreCid { .. } => "storeCID",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	CidStored,
	PredictionProcessed,
	PredictionRequested,
}

impl EventKind {
	pub fn name(&self) -> &'static str {
		match self {
			EventKind::CidStored => "CIDStored",
			EventKind::PredictionProcessed => "PredictionProcessed",
			EventKind::PredictionRequested => "PredictionRequested",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Where an event subscription starts. Only new blocks are watched; there is no replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockPosition {
	#[default]
	Latest,
	Number(u64),
}

/// A decoded oracle contract event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractEvent {
	CidStored { uploader: Address, cid: String },
	PredictionProcessed { processed_content: String },
	PredictionRequested { requester: Address, content: String, content2: String },
}

impl ContractEvent {
	pub fn kind(&self) -> EventKind {
		match self {
			ContractEvent::CidStored { .. } => EventKind::CidStored,
			ContractEvent::PredictionProcessed { .. } => EventKind::PredictionProcessed,
			ContractEvent::PredictionRequested { .. } => EventKind::PredictionRequested,
		}
	}
}

/// Provider independent view of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
	pub transaction_hash: B256,
	pub block_number: Option<u64>,
	pub from: Address,
	pub status: bool,
}

#[async_trait::async_trait]
pub trait WalletProvider: Send + Sync {
	/// Asks the provider for the accounts it may sign with. The first one is the caller.
	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

	/// Sends a zero-value write transaction and waits for its receipt.
	async fn send_transaction(
		&self,
		contract: Address,
		call: ContractCall,
		from: Address,
	) -> Result<TransactionReceipt, WalletError>;

	/// Subscribes to one event of the contract.
	async fn subscribe(
		&self,
		contract: Address,
		event: EventKind,
		from_block: BlockPosition,
	) -> Result<EventStream, WalletError>;

	/// Reads the CIDs stored in the contract.
	async fn get_cids(&self, contract: Address) -> Result<Vec<String>, WalletError>;
}
