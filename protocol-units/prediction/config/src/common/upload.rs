use crate::env_default;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
	/// Base URL of the upload backend, without the `/upload` suffix.
	#[serde(default = "default_api_url")]
	pub api_url: String,

	/// Identifier sent as the `user_id` form field.
	#[serde(default = "default_user_id")]
	pub user_id: String,
}

env_default!(default_api_url, "API_URL", String, "http://127.0.0.1:5000".to_string());

env_default!(default_user_id, "UPLOAD_USER_ID", String, "123".to_string());

impl Default for Config {
	fn default() -> Self {
		Config { api_url: default_api_url(), user_id: default_user_id() }
	}
}
