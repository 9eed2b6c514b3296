use crate::error::PredictionError;
use crate::listener::{EventListener, Subscription};
use crate::session::SessionState;
use crate::submitter::RequestSubmitter;
use crate::wallet::{Address, TransactionReceipt, WalletProvider};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A prediction request as sent to the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
	pub primary_text: String,
	pub secondary_text: String,
	pub requester: Address,
}

/// The outcome of one completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionOutcome {
	pub request: Request,
	pub receipt: TransactionReceipt,
	pub processed_content: String,
}

/// Submits a request and waits for its completion event, recording both in the session.
///
/// The session is bound to the completion events before the transaction is
/// sent so a fast result is not missed. The contract carries no correlation id,
/// so requests are serialised through the session and the first completion after
/// submission is returned as the outcome. After a successful run the binding
/// stays open, so later completions keep overwriting the session result until
/// the next run, [`PredictionFlow::unbind`] or the flow is dropped.
pub struct PredictionFlow<W: ?Sized> {
	submitter: RequestSubmitter<W>,
	listener: EventListener<W>,
	session: SessionState,
	completion_timeout: Duration,
	binding: Mutex<Option<Subscription>>,
}

impl<W> PredictionFlow<W>
where
	W: WalletProvider + ?Sized,
{
	pub fn new(
		wallet: Option<Arc<W>>,
		contract_address: Address,
		session: SessionState,
		completion_timeout: Duration,
	) -> Self {
		PredictionFlow {
			submitter: RequestSubmitter::new(wallet.clone(), contract_address),
			listener: EventListener::new(wallet, contract_address),
			session,
			completion_timeout,
			binding: Mutex::new(None),
		}
	}

	pub fn submitter(&self) -> &RequestSubmitter<W> {
		&self.submitter
	}

	pub fn listener(&self) -> &EventListener<W> {
		&self.listener
	}

	pub fn session(&self) -> &SessionState {
		&self.session
	}

	/// Whether completion events are currently being recorded in the session.
	pub fn is_bound(&self) -> bool {
		self.binding
			.lock()
			.map(|binding| binding.as_ref().is_some_and(Subscription::is_active))
			.unwrap_or(false)
	}

	/// Stops recording completion events in the session.
	pub fn unbind(&self) {
		self.replace_binding(None);
	}

	fn replace_binding(&self, subscription: Option<Subscription>) {
		let previous = match self.binding.lock() {
			Ok(mut binding) => std::mem::replace(&mut *binding, subscription),
			Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), subscription),
		};
		// dropping the previous subscription cancels it.
		drop(previous);
	}

	pub async fn run(
		&self,
		primary: &str,
		secondary: &str,
	) -> Result<PredictionOutcome, PredictionError> {
		self.run_until_cancelled(primary, secondary, CancellationToken::new()).await
	}

	/// Like [`PredictionFlow::run`], giving up with `Cancelled` once `cancel` fires.
	pub async fn run_until_cancelled(
		&self,
		primary: &str,
		secondary: &str,
		cancel: CancellationToken,
	) -> Result<PredictionOutcome, PredictionError> {
		let _permit = self.session.begin_request()?;
		self.unbind();
		self.session.set_request(primary, secondary);

		let result = self.submit_and_wait(primary, secondary, &cancel).await;
		if result.is_err() {
			self.unbind();
		}
		result
	}

	async fn submit_and_wait(
		&self,
		primary: &str,
		secondary: &str,
		cancel: &CancellationToken,
	) -> Result<PredictionOutcome, PredictionError> {
		let mut observer = self.session.observe();
		let (error_sender, mut errors) = mpsc::unbounded_channel();
		let subscription = self
			.listener
			.bind_session(&self.session, move |err| {
				let _ = error_sender.send(err);
			})
			.await?;
		self.replace_binding(Some(subscription));

		let receipt = tokio::select! {
			biased;
			_ = cancel.cancelled() => return Err(PredictionError::Cancelled),
			receipt = self.submitter.submit(primary, secondary) => receipt?,
		};
		let request = Request {
			primary_text: primary.to_string(),
			secondary_text: secondary.to_string(),
			requester: receipt.from,
		};

		let first_result = async {
			loop {
				tokio::select! {
					changed = observer.changed() => {
						if changed.is_err() {
							let reason = "session closed".to_string();
							return Err(PredictionError::SubscriptionError(reason));
						}
						if let Some(content) = observer.borrow_and_update().result.clone() {
							return Ok(content);
						}
					}
					err = errors.recv() => {
						return Err(err.unwrap_or_else(|| {
							PredictionError::SubscriptionError("event stream closed".to_string())
						}));
					}
				}
			}
		};

		let next = tokio::select! {
			biased;
			_ = cancel.cancelled() => return Err(PredictionError::Cancelled),
			next = tokio::time::timeout(self.completion_timeout, first_result) => next,
		};
		let processed_content = match next {
			Ok(result) => result?,
			Err(_elapsed) => {
				tracing::warn!(
					tx_hash = %receipt.transaction_hash,
					"no prediction result within {:?}",
					self.completion_timeout
				);
				return Err(PredictionError::SubmissionTimedOut(self.completion_timeout));
			}
		};

		tracing::info!(tx_hash = %receipt.transaction_hash, "prediction processed");
		Ok(PredictionOutcome { request, receipt, processed_content })
	}
}
