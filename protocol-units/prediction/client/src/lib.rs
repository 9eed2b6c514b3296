pub mod error;
pub mod flow;
pub mod listener;
pub mod session;
pub mod steps;
pub mod submitter;
pub mod upload;
pub mod wallet;

#[cfg(test)]
mod tests;

pub use error::{PredictionError, ValidationError};
pub use flow::{PredictionFlow, PredictionOutcome, Request};
pub use listener::{CompletionStream, EventListener, Subscription};
pub use session::{SessionSnapshot, SessionState};
pub use steps::{CollectionStep, Navigation, PredictionForm, ProcessingStep, Route};
pub use submitter::RequestSubmitter;
pub use upload::{UploadClient, UploadError};
pub use wallet::{Address, WalletError, WalletProvider};

#[cfg(feature = "eth")]
pub use wallet::eth::connect_wallet;

/// Parses the configured oracle contract address.
pub fn contract_address(config: &prediction_config::Config) -> Result<Address, anyhow::Error> {
	let raw = &config.contract.contract_address;
	raw.parse().map_err(|e| anyhow::anyhow!("Invalid contract address {}: {}", raw, e))
}
