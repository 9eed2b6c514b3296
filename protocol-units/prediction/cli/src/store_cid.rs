use crate::common_args::PredictionArgs;
use clap::Parser;
use prediction_client::{contract_address, RequestSubmitter};

#[derive(Debug, Parser, Clone)]
#[clap(rename_all = "kebab-case", about = "Records a content id on the oracle contract")]
pub struct StoreCid {
	#[clap(flatten)]
	pub prediction_args: PredictionArgs,

	#[clap(long)]
	pub cid: String,
}

impl StoreCid {
	pub async fn execute(&self) -> Result<(), anyhow::Error> {
		let config = self.prediction_args.config()?;
		let wallet = self.prediction_args.wallet(&config).await?;
		let submitter = RequestSubmitter::new(wallet, contract_address(&config)?);

		let receipt = match submitter.store_cid(&self.cid).await {
			Ok(receipt) => receipt,
			Err(err) => {
				println!("{}", err.user_message());
				return Err(err.into());
			}
		};
		println!("CID stored in transaction {}", receipt.transaction_hash);
		Ok(())
	}
}
