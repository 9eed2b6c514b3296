//! The two steps of a prediction session.
//!
//! The collection step takes the user's model and prompt, validates them and
//! runs the request. The processing step re-submits whatever the session holds
//! and sends the user back to collection when it holds nothing.

use crate::error::{PredictionError, ValidationError};
use crate::flow::{PredictionFlow, PredictionOutcome};
use crate::upload::UploadClient;
use crate::wallet::WalletProvider;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
	Collection,
	Processing,
}

impl Route {
	pub fn path(&self) -> &'static str {
		match self {
			Route::Collection => "/models",
			Route::Processing => "/prompt",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
	Redirect(Route),
	/// The step ran a request; the message is what the user sees.
	Rendered(String),
}

/// What the user typed into the collection step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionForm {
	pub model: String,
	pub prompt: String,
	/// A model file to upload before submitting.
	pub file: Option<PathBuf>,
}

impl PredictionForm {
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.model.trim().is_empty() && self.file.is_none() {
			return Err(ValidationError::MissingModel);
		}
		if self.prompt.trim().is_empty() {
			return Err(ValidationError::MissingPrompt);
		}
		Ok(())
	}
}

/// The single message shown for the outcome of a request.
pub fn render(result: &Result<PredictionOutcome, PredictionError>) -> String {
	match result {
		Ok(outcome) => format!("Prediction: {}", outcome.processed_content),
		Err(err) => err.user_message(),
	}
}

pub struct CollectionStep<W: ?Sized> {
	flow: Arc<PredictionFlow<W>>,
	uploader: Option<UploadClient>,
}

impl<W> CollectionStep<W>
where
	W: WalletProvider + ?Sized,
{
	pub fn new(flow: Arc<PredictionFlow<W>>, uploader: Option<UploadClient>) -> Self {
		CollectionStep { flow, uploader }
	}

	/// Validates the form, uploads its file if any and runs the request.
	///
	/// Nothing is uploaded or sent when validation fails or no wallet is
	/// available. With an uploaded file and no model text, the file's content id
	/// is submitted as the model.
	pub async fn submit(
		&self,
		form: &PredictionForm,
	) -> Result<PredictionOutcome, PredictionError> {
		form.validate()?;
		self.flow.submitter().wallet()?;

		let mut model = form.model.clone();
		if let Some(file) = &form.file {
			let uploader = self.uploader.as_ref().ok_or_else(|| {
				PredictionError::UploadFailed("no upload backend configured".into())
			})?;
			let cid = uploader.upload_file(file).await?;
			if model.trim().is_empty() {
				model = cid;
			}
		}

		self.flow.run(&model, &form.prompt).await
	}

	pub async fn submit_and_render(&self, form: &PredictionForm) -> String {
		render(&self.submit(form).await)
	}
}

pub struct ProcessingStep<W: ?Sized> {
	flow: Arc<PredictionFlow<W>>,
}

impl<W> ProcessingStep<W>
where
	W: WalletProvider + ?Sized,
{
	pub fn new(flow: Arc<PredictionFlow<W>>) -> Self {
		ProcessingStep { flow }
	}

	/// Submits the request stored in the session, or redirects to collection.
	pub async fn load(&self) -> Navigation {
		let snapshot = self.flow.session().get();
		let Some((primary, secondary)) = snapshot.request() else {
			tracing::debug!("no stored request, redirecting to {}", Route::Collection.path());
			return Navigation::Redirect(Route::Collection);
		};
		Navigation::Rendered(render(&self.flow.run(primary, secondary).await))
	}
}
