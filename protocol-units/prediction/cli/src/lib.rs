pub mod cids;
pub mod common_args;
pub mod connect;
pub mod request;
pub mod store_cid;
pub mod upload;
pub mod user;
pub mod watch;

use clap::Parser;

#[derive(Parser)]
#[clap(rename_all = "kebab-case", about = "Submit prediction requests to the oracle contract")]
pub enum PredictionCli {
	Connect(connect::Connect),
	Request(request::Request),
	Upload(upload::Upload),
	StoreCid(store_cid::StoreCid),
	Cids(cids::Cids),
	User(user::User),
	Watch(watch::Watch),
}

impl PredictionCli {
	pub async fn execute(&self) -> Result<(), anyhow::Error> {
		match self {
			Self::Connect(connect) => connect.execute().await,
			Self::Request(request) => request.execute().await,
			Self::Upload(upload) => upload.execute().await,
			Self::StoreCid(store_cid) => store_cid.execute().await,
			Self::Cids(cids) => cids.execute().await,
			Self::User(user) => user.execute().await,
			Self::Watch(watch) => watch.execute().await,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_request() -> Result<(), anyhow::Error> {
		let cli = PredictionCli::try_parse_from([
			"prediction",
			"request",
			"--model",
			"spam detection",
			"--prompt",
			"win a prize",
			"--timeout-ms",
			"5000",
		])?;
		match cli {
			PredictionCli::Request(request) => {
				assert_eq!(request.model, "spam detection");
				assert_eq!(request.prompt, "win a prize");
				assert_eq!(request.timeout_ms, Some(5000));
				assert!(request.file.is_none());
			}
			_ => panic!("expected the request subcommand"),
		}
		Ok(())
	}

	#[test]
	fn test_parse_store_cid() -> Result<(), anyhow::Error> {
		let cli = PredictionCli::try_parse_from([
			"prediction",
			"store-cid",
			"--cid",
			"bafkrei",
			"--prediction-path",
			"/tmp/prediction",
		])?;
		match cli {
			PredictionCli::StoreCid(store_cid) => {
				assert_eq!(store_cid.cid, "bafkrei");
				assert_eq!(
					store_cid.prediction_args.prediction_path.as_deref(),
					Some("/tmp/prediction")
				);
			}
			_ => panic!("expected the store-cid subcommand"),
		}
		Ok(())
	}
}
