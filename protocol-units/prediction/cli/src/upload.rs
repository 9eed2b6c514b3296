use crate::common_args::PredictionArgs;
use clap::Parser;
use prediction_client::{contract_address, PredictionError, RequestSubmitter};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(rename_all = "kebab-case", about = "Uploads a model file to the upload backend")]
pub struct Upload {
	#[clap(flatten)]
	pub prediction_args: PredictionArgs,

	#[clap(long)]
	pub file: PathBuf,

	/// Also records the returned content id on chain with `storeCID`.
	#[clap(long)]
	pub store_cid: bool,
}

impl Upload {
	pub async fn execute(&self) -> Result<(), anyhow::Error> {
		let config = self.prediction_args.config()?;
		let uploader = self.prediction_args.uploader(&config)?;

		let cid = match uploader.upload_file(&self.file).await {
			Ok(cid) => cid,
			Err(err) => {
				let err = PredictionError::from(err);
				println!("{}", err.user_message());
				return Err(err.into());
			}
		};
		println!("File uploaded successfully! CID: {cid}");

		if self.store_cid {
			let wallet = self.prediction_args.wallet(&config).await?;
			let submitter = RequestSubmitter::new(wallet, contract_address(&config)?);
			match submitter.store_cid(&cid).await {
				Ok(receipt) => println!("CID stored in transaction {}", receipt.transaction_hash),
				Err(err) => {
					println!("{}", err.user_message());
					return Err(err.into());
				}
			}
		}

		Ok(())
	}
}
