use clap::Parser;
use dot_prediction::DotPrediction;
use prediction_client::{
	connect_wallet, contract_address, PredictionFlow, SessionState, UploadClient, WalletProvider,
};
use prediction_config::Config;
use std::sync::Arc;

/// Arguments shared by every subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct PredictionArgs {
	/// The optional path to the DOT_PREDICTION directory.
	/// This will be read from an environment variable if not provided.
	#[clap(long, env = "DOT_PREDICTION_PATH")]
	pub prediction_path: Option<String>,
}

impl PredictionArgs {
	pub fn dot_prediction(&self) -> DotPrediction {
		match &self.prediction_path {
			Some(prediction_path) => DotPrediction::new(prediction_path),
			None => DotPrediction::try_from_env().unwrap_or_else(|_| DotPrediction::new(".")),
		}
	}

	/// Loads `config.json`, writing the defaults first if it does not exist.
	pub fn config(&self) -> Result<Config, anyhow::Error> {
		let dot_prediction = self.dot_prediction();
		let config: Config = dot_prediction.try_get_or_create_config_from_json()?;
		tracing::debug!("Loaded config from {}", dot_prediction.get_config_json_path().display());
		Ok(config)
	}

	/// The wallet provider, or `None` when the node cannot be reached.
	pub async fn wallet(
		&self,
		config: &Config,
	) -> Result<Option<Arc<dyn WalletProvider>>, anyhow::Error> {
		connect_wallet(config).await
	}

	pub async fn flow(
		&self,
		config: &Config,
	) -> Result<Arc<PredictionFlow<dyn WalletProvider>>, anyhow::Error> {
		let wallet = self.wallet(config).await?;
		Ok(Arc::new(PredictionFlow::new(
			wallet,
			contract_address(config)?,
			SessionState::new(),
			config.listener.completion_timeout(),
		)))
	}

	pub fn uploader(&self, config: &Config) -> Result<UploadClient, anyhow::Error> {
		UploadClient::try_from_config(config)
	}
}
