use prediction_config::Config;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
	#[error("could not read {path}: {source}")]
	ReadFile { path: String, source: std::io::Error },
	#[error("request to the upload backend failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("upload backend replied {status}: {message}")]
	Rejected { status: u16, message: String },
	#[error("unexpected upload backend reply: {0}")]
	InvalidResponse(String),
}

/// Reply of `POST /upload`: either `{success, cid}` or `{error}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
	#[serde(default)]
	pub success: Option<bool>,
	#[serde(default)]
	pub cid: Option<String>,
	#[serde(default)]
	pub error: Option<String>,
}

/// A backend user and the content ids uploaded under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
	#[serde(default)]
	pub id: serde_json::Value,
	#[serde(default)]
	pub cids: Vec<String>,
}

/// Client of the model file upload backend.
#[derive(Debug, Clone)]
pub struct UploadClient {
	client: reqwest::Client,
	api_url: String,
	user_id: String,
}

impl UploadClient {
	pub fn new(api_url: impl Into<String>, user_id: impl Into<String>) -> Self {
		let api_url = api_url.into().trim_end_matches('/').to_string();
		UploadClient { client: reqwest::Client::new(), api_url, user_id: user_id.into() }
	}

	pub fn try_from_config(config: &Config) -> Result<Self, anyhow::Error> {
		let api_url = config.upload_api_url()?;
		Ok(Self::new(api_url.as_str(), config.upload.user_id.clone()))
	}

	pub fn user_id(&self) -> &str {
		&self.user_id
	}

	/// Uploads the file at `path` and returns the content id the backend assigned.
	pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<String, UploadError> {
		let path = path.as_ref();
		let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::ReadFile {
			path: path.display().to_string(),
			source,
		})?;
		let file_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| "model".to_string());
		self.upload_bytes(file_name, bytes).await
	}

	pub async fn upload_bytes(
		&self,
		file_name: impl Into<String>,
		bytes: Vec<u8>,
	) -> Result<String, UploadError> {
		let file_name = file_name.into();
		let size = bytes.len();
		let form = Form::new()
			.part("file", Part::bytes(bytes).file_name(file_name.clone()))
			.text("user_id", self.user_id.clone());

		tracing::info!(%file_name, size, "uploading model file");
		let response =
			self.client.post(format!("{}/upload", self.api_url)).multipart(form).send().await?;
		let status = response.status();
		let body = response.text().await?;
		let reply: Option<UploadResponse> = serde_json::from_str(&body).ok();

		if !status.is_success() {
			let message = reply
				.and_then(|reply| reply.error)
				.or_else(|| status.canonical_reason().map(str::to_string))
				.unwrap_or(body);
			return Err(UploadError::Rejected { status: status.as_u16(), message });
		}

		let reply = reply.ok_or_else(|| UploadError::InvalidResponse(body.clone()))?;
		if let Some(message) = reply.error {
			return Err(UploadError::Rejected { status: status.as_u16(), message });
		}
		let cid = reply.cid.ok_or_else(|| UploadError::InvalidResponse(body))?;
		tracing::info!(%cid, "model file uploaded");
		Ok(cid)
	}

	/// Fetches the configured user and its uploaded content ids.
	pub async fn get_user(&self) -> Result<UserRecord, UploadError> {
		let response =
			self.client.get(format!("{}/users/{}", self.api_url, self.user_id)).send().await?;
		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			let message = serde_json::from_str::<UploadResponse>(&body)
				.ok()
				.and_then(|reply| reply.error)
				.unwrap_or(body);
			return Err(UploadError::Rejected { status: status.as_u16(), message });
		}
		serde_json::from_str(&body).map_err(|err| UploadError::InvalidResponse(err.to_string()))
	}
}
