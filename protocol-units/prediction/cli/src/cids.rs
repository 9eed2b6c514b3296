use crate::common_args::PredictionArgs;
use anyhow::Context;
use clap::Parser;
use prediction_client::{contract_address, PredictionError};

#[derive(Debug, Parser, Clone)]
#[clap(rename_all = "kebab-case", about = "Lists the content ids stored on the oracle contract")]
pub struct Cids {
	#[clap(flatten)]
	pub prediction_args: PredictionArgs,
}

impl Cids {
	pub async fn execute(&self) -> Result<(), anyhow::Error> {
		let config = self.prediction_args.config()?;
		let wallet =
			self.prediction_args
				.wallet(&config)
				.await?
				.ok_or(PredictionError::ProviderUnavailable)?;

		let cids = wallet
			.get_cids(contract_address(&config)?)
			.await
			.context("Failed to read stored CIDs")?;
		// Use println as this is standard (non-logging output)
		for cid in cids {
			println!("{cid}");
		}
		Ok(())
	}
}
