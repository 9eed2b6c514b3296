use super::WalletError;
use alloy::transports::TransportError;
use std::marker::PhantomData;

// Json-rpc error code a node uses for rejected transactions.
const SERVER_ERROR_CODE: i64 = -32000;
// EIP-1193 code for a request the account holder declined.
const USER_REJECTED_CODE: i64 = 4001;

// A rule inspects an error returned while sending a transaction and turns it into
// a specific `WalletError` when it recognises it. `None` means the rule doesn't apply.
// Nothing is retried here, the caller decides what to do with the error.
pub trait ClassifyRule: Sync + Send {
	fn classify(&self, error: &alloy::contract::Error) -> Option<WalletError>;
}

pub struct SendTransactionErrorRule<Kind> {
	_kind: PhantomData<Kind>,
}

impl<Kind> SendTransactionErrorRule<Kind> {
	pub fn new() -> Self {
		SendTransactionErrorRule { _kind: PhantomData }
	}
}

impl<Kind> Default for SendTransactionErrorRule<Kind> {
	fn default() -> Self {
		Self::new()
	}
}

pub struct UnderPriced;
pub struct InsufficientFunds;
pub struct UserRejected;

fn error_response(error: &alloy::contract::Error) -> Option<(i64, String)> {
	let alloy::contract::Error::TransportError(TransportError::ErrorResp(payload)) = error else {
		return None;
	};
	Some((payload.code, payload.message.to_string()))
}

impl ClassifyRule for SendTransactionErrorRule<UnderPriced> {
	fn classify(&self, error: &alloy::contract::Error) -> Option<WalletError> {
		let (code, message) = error_response(error)?;
		(code == SERVER_ERROR_CODE && message.contains("transaction underpriced"))
			.then_some(WalletError::UnderPriced(message))
	}
}

impl ClassifyRule for SendTransactionErrorRule<InsufficientFunds> {
	fn classify(&self, error: &alloy::contract::Error) -> Option<WalletError> {
		let (code, message) = error_response(error)?;
		(code == SERVER_ERROR_CODE && message.contains("insufficient funds"))
			.then_some(WalletError::InsufficientFunds(message))
	}
}

impl ClassifyRule for SendTransactionErrorRule<UserRejected> {
	fn classify(&self, error: &alloy::contract::Error) -> Option<WalletError> {
		let (code, message) = error_response(error)?;
		(code == USER_REJECTED_CODE).then_some(WalletError::Rejected(message))
	}
}

pub fn send_transaction_rules() -> Vec<Box<dyn ClassifyRule>> {
	vec![
		Box::new(SendTransactionErrorRule::<UnderPriced>::new()),
		Box::new(SendTransactionErrorRule::<InsufficientFunds>::new()),
		Box::new(SendTransactionErrorRule::<UserRejected>::new()),
	]
}

/// Applies the rules in order; unrecognised errors become `WalletError::Transport`.
pub fn classify_send_error(
	rules: &[Box<dyn ClassifyRule>],
	error: alloy::contract::Error,
) -> WalletError {
	rules
		.iter()
		.find_map(|rule| rule.classify(&error))
		.unwrap_or_else(|| WalletError::Transport(error.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn error_resp(code: i64, message: &str) -> alloy::contract::Error {
		let payload = serde_json::from_value(serde_json::json!({
			"code": code,
			"message": message,
		}))
		.expect("valid error payload");
		alloy::contract::Error::TransportError(TransportError::ErrorResp(payload))
	}

	#[test]
	fn test_classify_known_errors() {
		let rules = send_transaction_rules();

		let error = classify_send_error(
			&rules,
			error_resp(-32000, "insufficient funds for gas * price + value"),
		);
		assert!(matches!(error, WalletError::InsufficientFunds(_)));

		let error = classify_send_error(&rules, error_resp(-32000, "transaction underpriced"));
		assert!(matches!(error, WalletError::UnderPriced(_)));

		let error = classify_send_error(&rules, error_resp(4001, "User rejected the request."));
		assert_eq!(error, WalletError::Rejected("User rejected the request.".to_string()));
	}

	#[test]
	fn test_unknown_error_is_transport() {
		let rules = send_transaction_rules();
		let error = classify_send_error(&rules, error_resp(-32603, "internal error"));
		assert!(matches!(error, WalletError::Transport(_)));
	}
}
