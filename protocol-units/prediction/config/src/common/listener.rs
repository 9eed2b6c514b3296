use crate::env_short_default;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
	/// How long a submitted request waits for its completion event, in milliseconds.
	#[serde(default = "default_completion_timeout_ms")]
	pub completion_timeout_ms: u64,
}

env_short_default!(default_completion_timeout_ms, u64, 300_000u64);

impl Default for Config {
	fn default() -> Self {
		Config { completion_timeout_ms: default_completion_timeout_ms() }
	}
}

impl Config {
	pub fn completion_timeout(&self) -> Duration {
		Duration::from_millis(self.completion_timeout_ms)
	}
}
