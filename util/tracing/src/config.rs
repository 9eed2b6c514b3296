use anyhow::anyhow;
use std::env;
use std::path::PathBuf;

const LOG_FORMAT_ENV: &str = "PREDICTION_LOG_FORMAT";
const LOG_DIR_ENV: &str = "PREDICTION_LOG_DIR";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
}

/// Options for tracing configuration.
#[derive(Debug, Default)]
pub struct Config {
	pub format: LogFormat,
	/// Directory for a daily rolling log file.
	/// If the value is `None`, events are only written to stderr.
	pub log_dir: Option<PathBuf>,
}

impl Config {
	/// Get the tracing configuration from well-known environment variables.
	pub fn from_env() -> Result<Self, anyhow::Error> {
		let format = match read_var(LOG_FORMAT_ENV)?.as_deref() {
			None | Some("") | Some("pretty") => LogFormat::Pretty,
			Some("json") => LogFormat::Json,
			Some(other) => {
				return Err(anyhow!(
					"unsupported value of environment variable {LOG_FORMAT_ENV}: {other}"
				));
			}
		};
		let log_dir = read_var(LOG_DIR_ENV)?.filter(|dir| !dir.is_empty()).map(PathBuf::from);
		Ok(Self { format, log_dir })
	}
}

fn read_var(name: &str) -> Result<Option<String>, anyhow::Error> {
	match env::var(name) {
		Ok(value) => Ok(Some(value)),
		Err(env::VarError::NotPresent) => Ok(None),
		Err(env::VarError::NotUnicode(s)) => Err(anyhow!(
			"value of environment variable {name} is not valid UTF-8: {}",
			s.to_string_lossy()
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_env() -> Result<(), anyhow::Error> {
		env::set_var(LOG_FORMAT_ENV, "json");
		env::set_var(LOG_DIR_ENV, "/tmp/prediction-logs");
		let config = Config::from_env()?;
		assert_eq!(config.format, LogFormat::Json);
		assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/prediction-logs")));

		env::set_var(LOG_FORMAT_ENV, "yaml");
		assert!(Config::from_env().is_err());

		env::remove_var(LOG_FORMAT_ENV);
		env::remove_var(LOG_DIR_ENV);
		let config = Config::from_env()?;
		assert_eq!(config.format, LogFormat::Pretty);
		assert_eq!(config.log_dir, None);
		Ok(())
	}
}
