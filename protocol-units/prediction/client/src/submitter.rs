use crate::error::PredictionError;
use crate::wallet::{Address, ContractCall, TransactionReceipt, WalletProvider};
use std::sync::Arc;

/// Sends the oracle contract's write transactions on behalf of the wallet's first account.
///
/// The wallet is optional; without one every operation fails with
/// [`PredictionError::ProviderUnavailable`] before anything is sent.
pub struct RequestSubmitter<W: ?Sized> {
	wallet: Option<Arc<W>>,
	contract_address: Address,
}

impl<W: ?Sized> Clone for RequestSubmitter<W> {
	fn clone(&self) -> Self {
		RequestSubmitter { wallet: self.wallet.clone(), contract_address: self.contract_address }
	}
}

impl<W> RequestSubmitter<W>
where
	W: WalletProvider + ?Sized,
{
	pub fn new(wallet: Option<Arc<W>>, contract_address: Address) -> Self {
		RequestSubmitter { wallet, contract_address }
	}

	pub fn contract_address(&self) -> Address {
		self.contract_address
	}

	pub fn wallet(&self) -> Result<&Arc<W>, PredictionError> {
		self.wallet.as_ref().ok_or(PredictionError::ProviderUnavailable)
	}

	/// Requests account access and returns the account that will sign.
	pub async fn connect(&self) -> Result<Address, PredictionError> {
		let wallet = self.wallet()?;
		let accounts = wallet.request_accounts().await.map_err(PredictionError::from_accounts)?;
		let account = accounts.first().copied().ok_or(PredictionError::AccountAccessDenied)?;
		tracing::debug!(%account, "wallet account access granted");
		Ok(account)
	}

	/// Sends `requestPrediction(primary, secondary)` and waits for the receipt.
	pub async fn submit(
		&self,
		primary: &str,
		secondary: &str,
	) -> Result<TransactionReceipt, PredictionError> {
		let call = ContractCall::RequestPrediction {
			content1: primary.to_string(),
			content2: secondary.to_string(),
		};
		self.send(call).await
	}

	/// Sends `storeCID(cid)` and waits for the receipt.
	pub async fn store_cid(&self, cid: &str) -> Result<TransactionReceipt, PredictionError> {
		self.send(ContractCall::StoreCid { cid: cid.to_string() }).await
	}

	async fn send(&self, call: ContractCall) -> Result<TransactionReceipt, PredictionError> {
		let wallet = self.wallet()?;
		let from = self.connect().await?;
		let function = call.function_name();

		tracing::info!(%from, contract = %self.contract_address, "sending {function} transaction");
		let receipt = wallet
			.send_transaction(self.contract_address, call, from)
			.await
			.map_err(|err| {
				tracing::warn!("{function} transaction failed: {err}");
				PredictionError::from_send(err)
			})?;
		tracing::info!(
			tx_hash = %receipt.transaction_hash,
			block_number = ?receipt.block_number,
			"{function} transaction mined"
		);
		Ok(receipt)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::wallet::mock::MockWallet;
	use crate::wallet::WalletError;

	fn contract() -> Address {
		Address::repeat_byte(0xc0)
	}

	#[tokio::test]
	async fn test_submit_signs_with_first_account() -> Result<(), anyhow::Error> {
		let second = Address::repeat_byte(0x22);
		let wallet = Arc::new(MockWallet::new(vec![MockWallet::default_account(), second]));
		let submitter = RequestSubmitter::new(Some(wallet.clone()), contract());

		let receipt = submitter.submit("sentiment analysis", "what a day").await?;
		assert_eq!(receipt.from, MockWallet::default_account());
		assert_eq!(
			wallet.sent_transactions(),
			vec![(
				contract(),
				ContractCall::RequestPrediction {
					content1: "sentiment analysis".to_string(),
					content2: "what a day".to_string(),
				},
				MockWallet::default_account(),
			)]
		);
		Ok(())
	}

	#[tokio::test]
	async fn test_missing_provider() {
		let submitter: RequestSubmitter<MockWallet> = RequestSubmitter::new(None, contract());
		assert_eq!(submitter.submit("a", "b").await, Err(PredictionError::ProviderUnavailable));
		assert_eq!(submitter.connect().await, Err(PredictionError::ProviderUnavailable));
	}

	#[tokio::test]
	async fn test_account_access_denied() {
		let wallet = Arc::new(MockWallet::with_account());
		wallet.deny_accounts();
		let submitter = RequestSubmitter::new(Some(wallet.clone()), contract());
		assert_eq!(submitter.submit("a", "b").await, Err(PredictionError::AccountAccessDenied));
		assert!(wallet.sent_transactions().is_empty());

		let empty = Arc::new(MockWallet::new(vec![]));
		let submitter = RequestSubmitter::new(Some(empty), contract());
		assert_eq!(submitter.store_cid("cid").await, Err(PredictionError::AccountAccessDenied));
	}

	#[tokio::test]
	async fn test_send_failure_is_not_retried() {
		let wallet = Arc::new(MockWallet::with_account());
		wallet.fail_sends_with(WalletError::Transport("connection reset".to_string()));
		let submitter = RequestSubmitter::new(Some(wallet.clone()), contract());

		let result = submitter.submit("a", "b").await;
		assert_eq!(
			result,
			Err(PredictionError::SubmissionFailed("transport error: connection reset".to_string()))
		);
		assert_eq!(wallet.sent_transactions().len(), 1);
	}

	#[tokio::test]
	async fn test_dyn_wallet() -> Result<(), anyhow::Error> {
		let wallet: Arc<dyn WalletProvider> = Arc::new(MockWallet::with_account());
		let submitter = RequestSubmitter::new(Some(wallet), contract());
		let receipt = submitter.store_cid("bafkrei").await?;
		assert!(receipt.status);
		Ok(())
	}
}
