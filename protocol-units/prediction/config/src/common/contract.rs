use crate::{env_default, env_short_default};
use serde::{Deserialize, Serialize};

/// Sepolia deployment of the prediction oracle contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5f40d02e2c9a39c68FaAb5e21715455089026a91";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
	#[serde(default = "default_contract_address")]
	pub contract_address: String,

	/// Hex private key of the signing account.
	/// When unset, the node's own accounts are used through `eth_accounts`.
	/// Never written back to disk.
	#[serde(default = "default_signer_private_key", skip_serializing)]
	pub signer_private_key: Option<String>,

	/// Upper bound, in wei, on the fee of a single transaction.
	#[serde(default = "default_gas_limit")]
	pub gas_limit: u64,
}

env_default!(
	default_contract_address,
	"CONTRACT_ADDRESS",
	String,
	DEFAULT_CONTRACT_ADDRESS.to_string()
);

env_default!(default_signer_private_key, "PRIVATE_KEY", String);

env_short_default!(default_gas_limit, u64, 10_000_000_000_000_000u64);

impl Default for Config {
	fn default() -> Self {
		Config {
			contract_address: default_contract_address(),
			signer_private_key: default_signer_private_key(),
			gas_limit: default_gas_limit(),
		}
	}
}
