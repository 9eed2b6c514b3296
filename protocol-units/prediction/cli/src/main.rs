#![forbid(unsafe_code)]

use clap::*;
use prediction_cli::PredictionCli;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
	let tracing_config = prediction_tracing::Config::from_env()?;
	let _guard =
		prediction_tracing::init_tracing_subscriber(env!("CARGO_BIN_NAME"), &tracing_config)?;

	let prediction_cli = PredictionCli::parse();

	prediction_cli.execute().await?;

	Ok(())
}
