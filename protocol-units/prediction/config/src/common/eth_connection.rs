use crate::env_default;
use serde::{Deserialize, Serialize};

const DEFAULT_ETH_RPC_CONNECTION_HOSTNAME: &str = "ethereum-sepolia-rpc.publicnode.com";
const DEFAULT_ETH_RPC_CONNECTION_PORT: u16 = 443;
const DEFAULT_ETH_CHAIN_ID: u64 = 11155111; // sepolia

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
	#[serde(default = "default_eth_rpc_connection_protocol")]
	pub eth_rpc_connection_protocol: String,
	#[serde(default = "default_eth_rpc_connection_hostname")]
	pub eth_rpc_connection_hostname: String,
	#[serde(default = "default_eth_rpc_connection_port")]
	pub eth_rpc_connection_port: u16,

	#[serde(default = "default_eth_chain_id")]
	pub eth_chain_id: u64,
}

env_default!(
	default_eth_rpc_connection_protocol,
	"ETH_RPC_CONNECTION_PROTOCOL",
	String,
	"https".to_string()
);

env_default!(
	default_eth_rpc_connection_hostname,
	"ETH_RPC_CONNECTION_HOSTNAME",
	String,
	DEFAULT_ETH_RPC_CONNECTION_HOSTNAME.to_string()
);

env_default!(
	default_eth_rpc_connection_port,
	"ETH_RPC_CONNECTION_PORT",
	u16,
	DEFAULT_ETH_RPC_CONNECTION_PORT
);

env_default!(default_eth_chain_id, "ETH_CHAIN_ID", u64, DEFAULT_ETH_CHAIN_ID);

impl Default for Config {
	fn default() -> Self {
		Config {
			eth_rpc_connection_protocol: default_eth_rpc_connection_protocol(),
			eth_rpc_connection_hostname: default_eth_rpc_connection_hostname(),
			eth_rpc_connection_port: default_eth_rpc_connection_port(),
			eth_chain_id: default_eth_chain_id(),
		}
	}
}

impl Config {
	pub fn eth_rpc_connection_url(&self) -> String {
		format!(
			"{}://{}:{}",
			self.eth_rpc_connection_protocol,
			self.eth_rpc_connection_hostname,
			self.eth_rpc_connection_port
		)
	}
}
