use super::{
	Address, BlockPosition, ContractCall, ContractEvent, EventKind, EventStream,
	TransactionReceipt, WalletError, WalletProvider, B256,
};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

type EventResult = Result<(Address, ContractEvent), WalletError>;

/// In-memory wallet provider standing in for a chain.
///
/// Events only reach subscriptions opened before they are emitted, like a
/// node watching from the latest block.
pub struct MockWallet {
	accounts: Mutex<Result<Vec<Address>, WalletError>>,
	events: Mutex<Option<broadcast::Sender<EventResult>>>,
	sent: Mutex<Vec<(Address, ContractCall, Address)>>,
	send_failure: Mutex<Option<WalletError>>,
	auto_response: Mutex<Option<String>>,
	cids: Mutex<Vec<String>>,
	account_requests: AtomicUsize,
	subscriptions: AtomicUsize,
	block_number: AtomicU64,
}

impl MockWallet {
	pub fn new(accounts: Vec<Address>) -> Self {
		let (sender, _) = broadcast::channel(64);
		MockWallet {
			accounts: Mutex::new(Ok(accounts)),
			events: Mutex::new(Some(sender)),
			sent: Mutex::new(Vec::new()),
			send_failure: Mutex::new(None),
			auto_response: Mutex::new(None),
			cids: Mutex::new(Vec::new()),
			account_requests: AtomicUsize::new(0),
			subscriptions: AtomicUsize::new(0),
			block_number: AtomicU64::new(0),
		}
	}

	/// A wallet with a single deterministic account.
	pub fn with_account() -> Self {
		Self::new(vec![Self::default_account()])
	}

	pub fn default_account() -> Address {
		Address::repeat_byte(0x11)
	}

	/// Makes the next account requests fail as if the holder declined them.
	pub fn deny_accounts(&self) {
		*self.accounts.lock().expect("accounts lock poisoned") =
			Err(WalletError::Rejected("User rejected the request.".to_string()));
	}

	/// Makes every following transaction fail with `error`.
	pub fn fail_sends_with(&self, error: WalletError) {
		*self.send_failure.lock().expect("send failure lock poisoned") = Some(error);
	}

	/// Emits a `PredictionProcessed` event with `content` after every accepted
	/// `requestPrediction`, as a fast off-chain processor would.
	pub fn respond_with(&self, content: impl Into<String>) {
		*self.auto_response.lock().expect("auto response lock poisoned") = Some(content.into());
	}

	/// Emits an event from `contract` to every open subscription.
	pub fn emit(&self, contract: Address, event: ContractEvent) {
		self.broadcast(Ok((contract, event)));
	}

	/// Delivers a transport error to every open subscription.
	pub fn fail_subscriptions(&self, message: impl Into<String>) {
		self.broadcast(Err(WalletError::Subscription(message.into())));
	}

	/// Ends every open subscription stream. Later subscriptions fail.
	pub fn close_subscriptions(&self) {
		self.events.lock().expect("events lock poisoned").take();
	}

	pub fn account_requests(&self) -> usize {
		self.account_requests.load(Ordering::SeqCst)
	}

	pub fn subscriptions(&self) -> usize {
		self.subscriptions.load(Ordering::SeqCst)
	}

	pub fn sent_transactions(&self) -> Vec<(Address, ContractCall, Address)> {
		self.sent.lock().expect("sent lock poisoned").clone()
	}

	fn broadcast(&self, event: EventResult) {
		if let Some(sender) = self.events.lock().expect("events lock poisoned").as_ref() {
			// no receivers is not an error, the event is simply missed.
			let _ = sender.send(event);
		}
	}
}

#[async_trait::async_trait]
impl WalletProvider for MockWallet {
	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
		self.account_requests.fetch_add(1, Ordering::SeqCst);
		self.accounts.lock().expect("accounts lock poisoned").clone()
	}

	async fn send_transaction(
		&self,
		contract: Address,
		call: ContractCall,
		from: Address,
	) -> Result<TransactionReceipt, WalletError> {
		self.sent.lock().expect("sent lock poisoned").push((contract, call.clone(), from));
		if let Some(error) = self.send_failure.lock().expect("send failure lock poisoned").clone() {
			return Err(error);
		}

		let block_number = self.block_number.fetch_add(1, Ordering::SeqCst) + 1;
		let receipt = TransactionReceipt {
			transaction_hash: B256::with_last_byte(block_number as u8),
			block_number: Some(block_number),
			from,
			status: true,
		};

		match call {
			ContractCall::RequestPrediction { content1, content2 } => {
				self.emit(
					contract,
					ContractEvent::PredictionRequested {
						requester: from,
						content: content1,
						content2,
					},
				);
				let response =
					self.auto_response.lock().expect("auto response lock poisoned").clone();
				if let Some(processed_content) = response {
					self.emit(contract, ContractEvent::PredictionProcessed { processed_content });
				}
			}
			ContractCall::StoreCid { cid } => {
				self.cids.lock().expect("cids lock poisoned").push(cid.clone());
				self.emit(contract, ContractEvent::CidStored { uploader: from, cid });
			}
		}

		Ok(receipt)
	}

	async fn subscribe(
		&self,
		contract: Address,
		event: EventKind,
		_from_block: BlockPosition,
	) -> Result<EventStream, WalletError> {
		let receiver = self
			.events
			.lock()
			.expect("events lock poisoned")
			.as_ref()
			.map(|sender| sender.subscribe())
			.ok_or_else(|| WalletError::Subscription("event source closed".to_string()))?;
		self.subscriptions.fetch_add(1, Ordering::SeqCst);

		let stream = BroadcastStream::new(receiver).filter_map(move |item| match item {
			Ok(Ok((source, emitted))) if source == contract && emitted.kind() == event => {
				Some(Ok(emitted))
			}
			Ok(Ok(_)) => None,
			Ok(Err(err)) => Some(Err(err)),
			Err(lagged) => Some(Err(WalletError::Subscription(lagged.to_string()))),
		});
		Ok(Box::pin(stream))
	}

	async fn get_cids(&self, _contract: Address) -> Result<Vec<String>, WalletError> {
		Ok(self.cids.lock().expect("cids lock poisoned").clone())
	}
}

#[cfg(test)]
pub mod test {
	use super::*;

	fn contract() -> Address {
		Address::repeat_byte(0xc0)
	}

	#[tokio::test]
	async fn test_events_reach_open_subscriptions_only() -> Result<(), anyhow::Error> {
		let wallet = MockWallet::with_account();
		wallet.emit(
			contract(),
			ContractEvent::PredictionProcessed { processed_content: "missed".to_string() },
		);

		let mut stream =
			wallet
				.subscribe(contract(), EventKind::PredictionProcessed, BlockPosition::Latest)
				.await?;
		wallet.emit(
			contract(),
			ContractEvent::CidStored { uploader: MockWallet::default_account(), cid: "cid".into() },
		);
		wallet.emit(
			Address::repeat_byte(0x01),
			ContractEvent::PredictionProcessed { processed_content: "other contract".into() },
		);
		wallet.emit(
			contract(),
			ContractEvent::PredictionProcessed { processed_content: "seen".to_string() },
		);

		assert_eq!(
			stream.next().await.expect("stream has ended")?,
			ContractEvent::PredictionProcessed { processed_content: "seen".to_string() }
		);
		Ok(())
	}

	#[tokio::test]
	async fn test_store_cid_is_readable() -> Result<(), anyhow::Error> {
		let wallet = MockWallet::with_account();
		let receipt = wallet
			.send_transaction(
				contract(),
				ContractCall::StoreCid { cid: "bafy".to_string() },
				MockWallet::default_account(),
			)
			.await?;
		assert!(receipt.status);
		assert_eq!(receipt.block_number, Some(1));
		assert_eq!(wallet.get_cids(contract()).await?, vec!["bafy".to_string()]);
		Ok(())
	}

	#[tokio::test]
	async fn test_closed_source_ends_streams() -> Result<(), anyhow::Error> {
		let wallet = MockWallet::with_account();
		let mut stream =
			wallet
				.subscribe(contract(), EventKind::PredictionProcessed, BlockPosition::Latest)
				.await?;
		wallet.close_subscriptions();
		assert!(stream.next().await.is_none());
		assert!(wallet
			.subscribe(contract(), EventKind::PredictionProcessed, BlockPosition::Latest)
			.await
			.is_err());
		Ok(())
	}
}
