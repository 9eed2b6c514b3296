//! This crate provides configuration parameters for the prediction client:
//! how to reach the chain, which contract to talk to, where the upload
//! backend lives and how long to wait for a result.
use serde::{Deserialize, Serialize};

pub mod macros;
pub mod common;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
	/// The ETH connection configuration.
	#[serde(default)]
	pub eth_connection: common::eth_connection::Config,

	/// The prediction contract and the account that signs for it.
	#[serde(default)]
	pub contract: common::contract::Config,

	/// The model file upload backend.
	#[serde(default)]
	pub upload: common::upload::Config,

	/// Completion event handling.
	#[serde(default)]
	pub listener: common::listener::Config,
}

impl Config {
	/// Base URL of the upload backend, checked for well-formedness.
	pub fn upload_api_url(&self) -> Result<url::Url, anyhow::Error> {
		url::Url::parse(&self.upload.api_url)
			.map_err(|e| anyhow::anyhow!("Invalid upload api url {}: {}", self.upload.api_url, e))
	}
}
