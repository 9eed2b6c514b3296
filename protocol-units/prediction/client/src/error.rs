use crate::upload::UploadError;
use crate::wallet::WalletError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
	#[error("Either model text or file is required.")]
	MissingModel,
	#[error("Prompt is required.")]
	MissingPrompt,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictionError {
	#[error("no wallet provider available")]
	ProviderUnavailable,
	#[error("account access denied")]
	AccountAccessDenied,
	#[error("prediction request submission failed: {0}")]
	SubmissionFailed(String),
	#[error("prediction event subscription error: {0}")]
	SubscriptionError(String),
	#[error("upload failed: {0}")]
	UploadFailed(String),
	#[error("invalid input: {0}")]
	Validation(#[from] ValidationError),
	#[error("no prediction result within {0:?}")]
	SubmissionTimedOut(Duration),
	#[error("a prediction request is already in flight")]
	RequestInFlight,
	#[error("prediction request cancelled")]
	Cancelled,
}

impl PredictionError {
	/// The message shown to the user for this failure.
	pub fn user_message(&self) -> String {
		match self {
			PredictionError::ProviderUnavailable => {
				"No wallet provider detected. Please install or enable a wallet to continue."
					.to_string()
			}
			PredictionError::AccountAccessDenied => {
				"Wallet access was denied. Please connect an account and try again.".to_string()
			}
			PredictionError::SubmissionFailed(reason) => {
				format!("Error sending prediction request: {reason}")
			}
			PredictionError::SubscriptionError(reason) => {
				format!("Error fetching prediction output: {reason}")
			}
			PredictionError::UploadFailed(reason) => format!("Error uploading file: {reason}"),
			PredictionError::Validation(validation) => validation.to_string(),
			PredictionError::SubmissionTimedOut(timeout) => format!(
				"No prediction output received within {} seconds. You may submit again.",
				timeout.as_secs()
			),
			PredictionError::RequestInFlight => {
				"A prediction request is already being processed. Please wait for its result."
					.to_string()
			}
			PredictionError::Cancelled => "Prediction request cancelled.".to_string(),
		}
	}

	/// Maps a provider failure raised while sending a transaction.
	pub(crate) fn from_send(error: WalletError) -> Self {
		match error {
			WalletError::Unavailable(_) => PredictionError::ProviderUnavailable,
			other => PredictionError::SubmissionFailed(other.to_string()),
		}
	}

	/// Maps a provider failure raised while requesting accounts.
	pub(crate) fn from_accounts(error: WalletError) -> Self {
		match error {
			WalletError::Unavailable(_) => PredictionError::ProviderUnavailable,
			WalletError::Rejected(_) => PredictionError::AccountAccessDenied,
			other => PredictionError::SubmissionFailed(other.to_string()),
		}
	}

	/// Maps a provider failure raised while subscribing to or reading events.
	pub(crate) fn from_subscription(error: WalletError) -> Self {
		match error {
			WalletError::Unavailable(_) => PredictionError::ProviderUnavailable,
			other => PredictionError::SubscriptionError(other.to_string()),
		}
	}
}

impl From<UploadError> for PredictionError {
	fn from(error: UploadError) -> Self {
		PredictionError::UploadFailed(error.to_string())
	}
}
