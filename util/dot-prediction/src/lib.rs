use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory holding the prediction client's `config.json`.
#[derive(Debug, Clone)]
pub struct DotPrediction(PathBuf);

impl DotPrediction {
	const DEFAULT_DOT_PREDICTION_PATH_VAR_NAME: &'static str = "DOT_PREDICTION_PATH";

	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self(path.into())
	}

	pub fn get_path(&self) -> &Path {
		&self.0
	}

	pub fn get_config_json_path(&self) -> PathBuf {
		self.0.join("config.json")
	}

	/// Reads the configuration, writing `T::default()` first if no file exists yet.
	pub fn try_get_or_create_config_from_json<T>(&self) -> Result<T, anyhow::Error>
	where
		T: serde::de::DeserializeOwned + serde::Serialize + Default,
	{
		let config_path = self.get_config_json_path();
		if !config_path.exists() {
			std::fs::DirBuilder::new().recursive(true).create(
				config_path
					.parent()
					.ok_or(anyhow::anyhow!("Failed to get parent directory of config path"))?,
			)?;

			let mut file = std::fs::File::create_new(&config_path)?;
			let json_contents = serde_json::to_string_pretty(&T::default())?;
			file.write_all(json_contents.as_bytes())?;
			file.sync_all()?;
		}

		self.try_get_config_from_json()
	}

	/// Tries to get a configuration from the JSON file.
	pub fn try_get_config_from_json<T: serde::de::DeserializeOwned>(
		&self,
	) -> Result<T, anyhow::Error> {
		let file = std::fs::File::open(self.get_config_json_path())
			.map_err(|e| anyhow::anyhow!("Failed to open file: {}", e))?;
		let reader = std::io::BufReader::new(file);
		let config = serde_json::from_reader(reader)
			.map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;
		Ok(config)
	}

	/// Tries to write a configuration to the JSON file.
	pub fn try_write_config_to_json<T: serde::Serialize>(
		&self,
		config: &T,
	) -> Result<(), anyhow::Error> {
		let file = std::fs::File::create(self.get_config_json_path())
			.map_err(|e| anyhow::anyhow!("Failed to create file: {}", e))?;
		let writer = std::io::BufWriter::new(file);
		serde_json::to_writer_pretty(writer, config)
			.map_err(|e| anyhow::anyhow!("Failed to write config: {}", e))?;
		Ok(())
	}

	pub fn try_from_env() -> Result<Self, anyhow::Error> {
		let path = std::env::var(Self::DEFAULT_DOT_PREDICTION_PATH_VAR_NAME)
			.map_err(|_| anyhow::anyhow!("Dot prediction path not provided"))?;
		Ok(Self::new(path))
	}
}

impl From<DotPrediction> for PathBuf {
	fn from(dot: DotPrediction) -> Self {
		dot.0
	}
}
