use crate::common_args::PredictionArgs;
use clap::Parser;
use prediction_client::steps::render;
use prediction_client::{CollectionStep, PredictionForm};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
	rename_all = "kebab-case",
	about = "Submits a model and prompt to the oracle contract and waits for the prediction"
)]
pub struct Request {
	#[clap(flatten)]
	pub prediction_args: PredictionArgs,

	/// Description of the model to run. May be left out when a model file is given.
	#[clap(long, default_value = "")]
	pub model: String,

	/// The input to run the model on.
	#[clap(long, default_value = "")]
	pub prompt: String,

	/// A model file to upload before submitting.
	#[clap(long)]
	pub file: Option<PathBuf>,

	/// Overrides the configured completion timeout.
	#[clap(long)]
	pub timeout_ms: Option<u64>,
}

impl Request {
	pub async fn execute(&self) -> Result<(), anyhow::Error> {
		let mut config = self.prediction_args.config()?;
		if let Some(timeout_ms) = self.timeout_ms {
			config.listener.completion_timeout_ms = timeout_ms;
		}

		let form = PredictionForm {
			model: self.model.clone(),
			prompt: self.prompt.clone(),
			file: self.file.clone(),
		};
		// checked here so an invalid form never reaches the node
		if let Err(err) = form.validate() {
			println!("{err}");
			return Err(err.into());
		}

		let flow = self.prediction_args.flow(&config).await?;
		let uploader = self.prediction_args.uploader(&config)?;
		let step = CollectionStep::new(flow, Some(uploader));

		let result = step.submit(&form).await;
		println!("{}", render(&result));
		result?;
		Ok(())
	}
}
