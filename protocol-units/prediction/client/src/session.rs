use crate::error::PredictionError;
use std::sync::Arc;
use tokio::sync::{watch, OwnedSemaphorePermit, Semaphore};

/// What the session currently holds. `None` means the value was never set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
	pub primary_text: Option<String>,
	pub secondary_text: Option<String>,
	pub result: Option<String>,
}

impl SessionSnapshot {
	/// The stored request pair, if both strings are present and non-empty.
	pub fn request(&self) -> Option<(&str, &str)> {
		match (self.primary_text.as_deref(), self.secondary_text.as_deref()) {
			(Some(primary), Some(secondary)) if !primary.is_empty() && !secondary.is_empty() => {
				Some((primary, secondary))
			}
			_ => None,
		}
	}
}

/// Session-wide holder of the latest request and result.
///
/// Cloning yields another handle to the same state. Writes are last-write-wins
/// and observable through [`SessionState::observe`]. At most one request may be
/// in flight at a time, see [`SessionState::begin_request`].
#[derive(Debug, Clone)]
pub struct SessionState {
	state: Arc<watch::Sender<SessionSnapshot>>,
	in_flight: Arc<Semaphore>,
}

/// Held for as long as a request is in flight.
#[derive(Debug)]
pub struct InFlightPermit(#[allow(dead_code)] OwnedSemaphorePermit);

impl Default for SessionState {
	fn default() -> Self {
		Self::new()
	}
}

impl SessionState {
	pub fn new() -> Self {
		let (sender, _) = watch::channel(SessionSnapshot::default());
		SessionState { state: Arc::new(sender), in_flight: Arc::new(Semaphore::new(1)) }
	}

	pub fn get(&self) -> SessionSnapshot {
		self.state.borrow().clone()
	}

	/// Stores a new request pair. The result of the previous request is cleared.
	pub fn set_request(&self, primary: impl Into<String>, secondary: impl Into<String>) {
		let primary = primary.into();
		let secondary = secondary.into();
		self.state.send_modify(|snapshot| {
			snapshot.primary_text = Some(primary);
			snapshot.secondary_text = Some(secondary);
			snapshot.result = None;
		});
	}

	pub fn set_result(&self, content: impl Into<String>) {
		let content = content.into();
		self.state.send_modify(|snapshot| snapshot.result = Some(content));
	}

	/// Forgets everything, as when a new collection starts.
	pub fn reset(&self) {
		self.state.send_replace(SessionSnapshot::default());
	}

	/// A receiver notified on every write.
	pub fn observe(&self) -> watch::Receiver<SessionSnapshot> {
		self.state.subscribe()
	}

	/// Claims the single in-flight slot of the session.
	pub fn begin_request(&self) -> Result<InFlightPermit, PredictionError> {
		self.in_flight
			.clone()
			.try_acquire_owned()
			.map(InFlightPermit)
			.map_err(|_| PredictionError::RequestInFlight)
	}

	pub fn is_request_in_flight(&self) -> bool {
		self.in_flight.available_permits() == 0
	}
}
