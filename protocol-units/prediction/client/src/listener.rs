use crate::error::PredictionError;
use crate::session::SessionState;
use crate::wallet::{Address, BlockPosition, ContractEvent, EventKind, WalletProvider};
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<String, PredictionError>> + Send>>;

/// Watches the oracle contract for `PredictionProcessed` events.
pub struct EventListener<W: ?Sized> {
	wallet: Option<Arc<W>>,
	contract_address: Address,
}

impl<W: ?Sized> Clone for EventListener<W> {
	fn clone(&self) -> Self {
		EventListener { wallet: self.wallet.clone(), contract_address: self.contract_address }
	}
}

impl<W> EventListener<W>
where
	W: WalletProvider + ?Sized,
{
	pub fn new(wallet: Option<Arc<W>>, contract_address: Address) -> Self {
		EventListener { wallet, contract_address }
	}

	/// Opens a stream of completion contents starting at the latest block.
	///
	/// A transport error is yielded once and ends the stream; nothing reconnects.
	pub async fn completions(&self) -> Result<CompletionStream, PredictionError> {
		let wallet = self.wallet.as_ref().ok_or(PredictionError::ProviderUnavailable)?;
		let events = wallet
			.subscribe(self.contract_address, EventKind::PredictionProcessed, BlockPosition::Latest)
			.await
			.map_err(PredictionError::from_subscription)?;

		let mut failed = false;
		let completions = events
			.take_while(move |item| {
				let keep = !failed;
				failed = failed || item.is_err();
				keep
			})
			.filter_map(|item| match item {
				Ok(ContractEvent::PredictionProcessed { processed_content }) => {
					Some(Ok(processed_content))
				}
				Ok(other) => {
					tracing::trace!(kind = %other.kind(), "ignoring contract event");
					None
				}
				Err(err) => Some(Err(PredictionError::from_subscription(err))),
			});
		Ok(Box::pin(completions))
	}

	/// Invokes `on_result` for every completion event until the subscription ends.
	///
	/// A transport error or the end of the event source invokes `on_error` once
	/// and ends the subscription.
	pub async fn subscribe<R, E>(
		&self,
		mut on_result: R,
		mut on_error: E,
	) -> Result<Subscription, PredictionError>
	where
		R: FnMut(String) + Send + 'static,
		E: FnMut(PredictionError) + Send + 'static,
	{
		let mut completions = self.completions().await?;
		let token = CancellationToken::new();
		let cancelled = token.clone();

		let handle = tokio::spawn(async move {
			loop {
				tokio::select! {
					biased;
					_ = cancelled.cancelled() => {
						tracing::debug!("prediction subscription cancelled");
						break;
					}
					next = completions.next() => match next {
						Some(Ok(content)) => {
							tracing::debug!("prediction processed event received");
							on_result(content);
						}
						Some(Err(err)) => {
							tracing::error!("prediction subscription failed: {err}");
							on_error(err);
							break;
						}
						None => {
							on_error(PredictionError::SubscriptionError(
								"event stream closed".to_string(),
							));
							break;
						}
					}
				}
			}
		});

		Ok(Subscription { token, handle: Some(handle) })
	}

	/// Records every completion in `session` until the subscription ends.
	///
	/// Later completions overwrite earlier ones. A transport error or the end of
	/// the event source is passed to `on_error` once.
	pub async fn bind_session<E>(
		&self,
		session: &SessionState,
		on_error: E,
	) -> Result<Subscription, PredictionError>
	where
		E: FnMut(PredictionError) + Send + 'static,
	{
		let session = session.clone();
		self.subscribe(move |content| session.set_result(content), on_error).await
	}
}

/// A running event subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
	token: CancellationToken,
	handle: Option<JoinHandle<()>>,
}

impl Subscription {
	/// A token that ends the subscription when cancelled, for wiring into a teardown.
	pub fn cancellation_token(&self) -> CancellationToken {
		self.token.clone()
	}

	pub fn is_active(&self) -> bool {
		self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
	}

	pub fn unsubscribe(&self) {
		self.token.cancel();
	}

	/// Waits until the subscription has ended, without cancelling it.
	pub async fn closed(mut self) {
		if let Some(handle) = self.handle.take() {
			if let Err(err) = handle.await {
				tracing::error!("prediction subscription task failed: {err}");
			}
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if self.handle.is_some() {
			self.token.cancel();
		}
	}
}
