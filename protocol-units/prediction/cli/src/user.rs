use crate::common_args::PredictionArgs;
use clap::Parser;
use prediction_client::PredictionError;

#[derive(Debug, Parser, Clone)]
#[clap(
	rename_all = "kebab-case",
	about = "Shows the configured upload backend user and its uploaded content ids"
)]
pub struct User {
	#[clap(flatten)]
	pub prediction_args: PredictionArgs,
}

impl User {
	pub async fn execute(&self) -> Result<(), anyhow::Error> {
		let config = self.prediction_args.config()?;
		let uploader = self.prediction_args.uploader(&config)?;

		let user = match uploader.get_user().await {
			Ok(user) => user,
			Err(err) => {
				let err = PredictionError::from(err);
				println!("{}", err.user_message());
				return Err(err.into());
			}
		};
		println!("{}", serde_json::to_string_pretty(&user)?);
		Ok(())
	}
}
