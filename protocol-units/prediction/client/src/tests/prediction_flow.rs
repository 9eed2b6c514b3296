use crate::wallet::mock::MockWallet;
use crate::wallet::ContractEvent;
use crate::{
	Address, CollectionStep, EventListener, Navigation, PredictionError, PredictionFlow,
	PredictionForm, ProcessingStep, RequestSubmitter, Route, SessionState, UploadClient,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn contract() -> Address {
	Address::repeat_byte(0xc0)
}

fn processed(content: &str) -> ContractEvent {
	ContractEvent::PredictionProcessed { processed_content: content.to_string() }
}

fn flow(wallet: Option<Arc<MockWallet>>, timeout: Duration) -> Arc<PredictionFlow<MockWallet>> {
	Arc::new(PredictionFlow::new(wallet, contract(), SessionState::new(), timeout))
}

#[tokio::test]
async fn test_missing_model_makes_no_provider_calls() {
	let wallet = Arc::new(MockWallet::with_account());
	let step = CollectionStep::new(flow(Some(wallet.clone()), Duration::from_secs(5)), None);
	let form = PredictionForm { model: String::new(), prompt: "is this spam?".into(), file: None };

	let result = step.submit(&form).await;
	assert!(matches!(result, Err(PredictionError::Validation(_))));
	assert_eq!(wallet.account_requests(), 0);
	assert_eq!(wallet.subscriptions(), 0);
	assert!(wallet.sent_transactions().is_empty());
}

#[tokio::test]
async fn test_no_provider() {
	let step = CollectionStep::new(flow(None, Duration::from_secs(5)), None);
	let form = PredictionForm { model: "m".into(), prompt: "p".into(), file: None };

	assert_eq!(step.submit(&form).await, Err(PredictionError::ProviderUnavailable));
	assert_eq!(
		step.submit_and_render(&form).await,
		"No wallet provider detected. Please install or enable a wallet to continue."
	);
}

#[tokio::test]
async fn test_single_completion_delivered_once() -> Result<(), anyhow::Error> {
	let wallet = Arc::new(MockWallet::with_account());
	let session = SessionState::new();
	let listener = EventListener::new(Some(wallet.clone()), contract());
	let subscription = listener.bind_session(&session, |_| {}).await?;

	wallet.respond_with("42");
	session.set_request("number model", "the answer");
	let mut observer = session.observe();
	RequestSubmitter::new(Some(wallet.clone()), contract())
		.submit("number model", "the answer")
		.await?;

	observer.changed().await?;
	assert_eq!(observer.borrow_and_update().result.as_deref(), Some("42"));
	assert!(tokio::time::timeout(Duration::from_millis(200), observer.changed()).await.is_err());

	subscription.unsubscribe();
	subscription.closed().await;
	assert_eq!(session.get().result.as_deref(), Some("42"));
	assert_eq!(session.get().request(), Some(("number model", "the answer")));
	Ok(())
}

#[tokio::test]
async fn test_last_event_wins() -> Result<(), anyhow::Error> {
	let wallet = Arc::new(MockWallet::with_account());
	let session = SessionState::new();
	let listener = EventListener::new(Some(wallet.clone()), contract());
	let mut observer = session.observe();
	let subscription = listener.bind_session(&session, |_| {}).await?;

	wallet.emit(contract(), processed("A"));
	wallet.emit(contract(), processed("B"));
	loop {
		observer.changed().await?;
		if observer.borrow_and_update().result.as_deref() == Some("B") {
			break;
		}
	}
	drop(subscription);

	assert_eq!(session.get().result.as_deref(), Some("B"));
	Ok(())
}

#[tokio::test]
async fn test_flow_records_completions_after_the_run() -> Result<(), anyhow::Error> {
	let wallet = Arc::new(MockWallet::with_account());
	wallet.respond_with("A");
	let flow = flow(Some(wallet.clone()), Duration::from_secs(5));
	let mut observer = flow.session().observe();

	let outcome = flow.run("model", "prompt").await?;
	assert_eq!(outcome.processed_content, "A");

	wallet.emit(contract(), processed("B"));
	loop {
		observer.changed().await?;
		if observer.borrow_and_update().result.as_deref() == Some("B") {
			break;
		}
	}
	assert_eq!(flow.session().get().result.as_deref(), Some("B"));
	Ok(())
}

#[tokio::test]
async fn test_processing_without_request_redirects() {
	let wallet = Arc::new(MockWallet::with_account());
	let flow = flow(Some(wallet.clone()), Duration::from_secs(5));
	flow.session().set_request("", "only a prompt");

	let step = ProcessingStep::new(flow);
	assert_eq!(step.load().await, Navigation::Redirect(Route::Collection));
	assert_eq!(wallet.account_requests(), 0);
	assert!(wallet.sent_transactions().is_empty());
}

#[tokio::test]
async fn test_collection_then_processing() -> Result<(), anyhow::Error> {
	let wallet = Arc::new(MockWallet::with_account());
	wallet.respond_with("ham");
	let flow = flow(Some(wallet.clone()), Duration::from_secs(5));
	let form = PredictionForm {
		model: "spam detection".into(),
		prompt: "see you at lunch".into(),
		file: None,
	};

	let outcome = CollectionStep::new(flow.clone(), None).submit(&form).await?;
	assert_eq!(outcome.processed_content, "ham");

	let step = ProcessingStep::new(flow.clone());
	assert_eq!(step.load().await, Navigation::Rendered("Prediction: ham".to_string()));
	assert_eq!(wallet.sent_transactions().len(), 2);
	Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_no_event_times_out() {
	let wallet = Arc::new(MockWallet::with_account());
	let flow = flow(Some(wallet), Duration::from_secs(120));
	let step = CollectionStep::new(flow.clone(), None);
	let form = PredictionForm { model: "m".into(), prompt: "p".into(), file: None };

	assert_eq!(
		step.submit_and_render(&form).await,
		"No prediction output received within 120 seconds. You may submit again."
	);
	assert!(!flow.session().is_request_in_flight());
}

#[tokio::test]
async fn test_upload_error_stops_submission() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/upload"))
		.respond_with(
			ResponseTemplate::new(400)
				.set_body_json(serde_json::json!({ "error": "No file or user ID provided" })),
		)
		.mount(&server)
		.await;

	let dir = tempfile::tempdir().expect("tempdir");
	let model_path = dir.path().join("model.bin");
	std::fs::write(&model_path, b"weights").expect("write model file");

	let wallet = Arc::new(MockWallet::with_account());
	let step = CollectionStep::new(
		flow(Some(wallet.clone()), Duration::from_secs(5)),
		Some(UploadClient::new(server.uri(), "123")),
	);
	let form = PredictionForm { model: String::new(), prompt: "p".into(), file: Some(model_path) };

	let result = step.submit(&form).await;
	assert!(matches!(
		&result,
		Err(PredictionError::UploadFailed(reason)) if reason.contains("No file or user ID provided")
	));
	assert!(wallet.sent_transactions().is_empty());
}

#[tokio::test]
async fn test_uploaded_cid_stands_in_for_model() -> Result<(), anyhow::Error> {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/upload"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(serde_json::json!({ "success": true, "cid": "bafkreimodel" })),
		)
		.mount(&server)
		.await;

	let dir = tempfile::tempdir()?;
	let model_path = dir.path().join("model.bin");
	std::fs::write(&model_path, b"weights")?;

	let wallet = Arc::new(MockWallet::with_account());
	wallet.respond_with("done");
	let flow = flow(Some(wallet.clone()), Duration::from_secs(5));
	let step = CollectionStep::new(flow.clone(), Some(UploadClient::new(server.uri(), "123")));
	let form = PredictionForm { model: " ".into(), prompt: "p".into(), file: Some(model_path) };

	let outcome = step.submit(&form).await?;
	assert_eq!(outcome.request.primary_text, "bafkreimodel");
	assert_eq!(flow.session().get().request(), Some(("bafkreimodel", "p")));
	Ok(())
}

#[tokio::test]
async fn test_dropped_subscription_stops_delivery() -> Result<(), anyhow::Error> {
	let wallet = Arc::new(MockWallet::with_account());
	let listener = EventListener::new(Some(wallet.clone()), contract());
	let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();

	let subscription = listener
		.subscribe(
			move |content| {
				let _ = sender.send(content);
			},
			|_| {},
		)
		.await?;
	wallet.emit(contract(), processed("before"));
	assert_eq!(receiver.recv().await.as_deref(), Some("before"));

	drop(subscription);
	wallet.emit(contract(), processed("after"));
	assert_eq!(receiver.recv().await, None);
	Ok(())
}
