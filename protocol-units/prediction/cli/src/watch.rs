use crate::common_args::PredictionArgs;
use clap::Parser;
use prediction_client::{contract_address, EventListener};

#[derive(Debug, Parser, Clone)]
#[clap(
	rename_all = "kebab-case",
	about = "Prints every prediction the oracle contract publishes until interrupted"
)]
pub struct Watch {
	#[clap(flatten)]
	pub prediction_args: PredictionArgs,
}

impl Watch {
	pub async fn execute(&self) -> Result<(), anyhow::Error> {
		let config = self.prediction_args.config()?;
		let wallet = self.prediction_args.wallet(&config).await?;
		let listener = EventListener::new(wallet, contract_address(&config)?);

		let subscription = listener
			.subscribe(
				|content| println!("Prediction: {content}"),
				|err| println!("{}", err.user_message()),
			)
			.await?;
		let token = subscription.cancellation_token();

		tokio::select! {
			_ = tokio::signal::ctrl_c() => {
				tracing::info!("interrupted, unsubscribing");
				token.cancel();
			}
			_ = subscription.closed() => {}
		}
		Ok(())
	}
}
