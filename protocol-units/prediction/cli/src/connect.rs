use crate::common_args::PredictionArgs;
use clap::Parser;
use prediction_client::{contract_address, RequestSubmitter};

#[derive(Debug, Parser, Clone)]
#[clap(rename_all = "kebab-case", about = "Requests account access and prints the signing account")]
pub struct Connect {
	#[clap(flatten)]
	pub prediction_args: PredictionArgs,
}

impl Connect {
	pub async fn execute(&self) -> Result<(), anyhow::Error> {
		let config = self.prediction_args.config()?;
		let wallet = self.prediction_args.wallet(&config).await?;
		let submitter = RequestSubmitter::new(wallet, contract_address(&config)?);

		match submitter.connect().await {
			Ok(account) => {
				println!("Connected account: {account}");
				Ok(())
			}
			Err(err) => {
				println!("{}", err.user_message());
				Err(err.into())
			}
		}
	}
}
