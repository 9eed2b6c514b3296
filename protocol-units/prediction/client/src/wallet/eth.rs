use super::rules::{classify_send_error, send_transaction_rules, ClassifyRule};
use super::{
	Address, BlockPosition, ContractCall, ContractEvent, EventKind, EventStream,
	TransactionReceipt, WalletError, WalletProvider,
};
use prediction_config::Config;

use alloy::contract::{CallBuilder, CallDecoder};
use alloy::eips::BlockNumberOrTag;
use alloy::network::{Ethereum, EthereumWallet};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::Transport;
use anyhow::Context;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_stream::StreamExt;

// Bindings are generated from the deployed oracle's JSON ABI.
alloy::sol!(
	#[allow(missing_docs)]
	#[sol(rpc)]
	PredictionOracle,
	"abis/PredictionOracle.json"
);

/// Wallet provider backed by an Ethereum json-rpc node.
///
/// With a local signer the only account is the signer's address. Without one,
/// accounts and signing are delegated to the node (`eth_accounts`).
pub struct EthWallet<P, T> {
	provider: P,
	signer_address: Option<Address>,
	gas_limit: u128,
	send_transaction_rules: Vec<Box<dyn ClassifyRule>>,
	_marker: PhantomData<T>,
}

impl<P, T> EthWallet<P, T>
where
	P: Provider<T, Ethereum> + Clone + 'static,
	T: Transport + Clone,
{
	pub fn new(provider: P, signer_address: Option<Address>, gas_limit: u128) -> Self {
		EthWallet {
			provider,
			signer_address,
			gas_limit,
			send_transaction_rules: send_transaction_rules(),
			_marker: PhantomData,
		}
	}

	async fn send_call<D>(
		&self,
		call: CallBuilder<T, &P, D, Ethereum>,
	) -> Result<TransactionReceipt, WalletError>
	where
		D: CallDecoder + Send + Sync,
	{
		let estimate_gas = call
			.estimate_gas()
			.await
			.map_err(|err| classify_send_error(&self.send_transaction_rules, err))?;

		// detect if the fee doesn't exceed the limit.
		let gas_price = self
			.provider
			.get_gas_price()
			.await
			.map_err(|err| WalletError::Transport(err.to_string()))?;
		check_fee_limit(estimate_gas, gas_price, self.gas_limit)?;

		let call = call.gas(estimate_gas);
		let pending_transaction = call
			.send()
			.await
			.map_err(|err| classify_send_error(&self.send_transaction_rules, err))?;
		tracing::debug!(tx_hash = %pending_transaction.tx_hash(), "transaction sent");

		let receipt = pending_transaction
			.get_receipt()
			.await
			.map_err(|err| WalletError::Execution(err.to_string()))?;
		if !receipt.status() {
			tracing::warn!("transaction reverted, receipt:{receipt:?}");
			return Err(WalletError::Execution(format!(
				"transaction {} reverted",
				receipt.transaction_hash
			)));
		}

		Ok(TransactionReceipt {
			transaction_hash: receipt.transaction_hash,
			block_number: receipt.block_number,
			from: receipt.from,
			status: true,
		})
	}
}

/// Rejects a transaction whose fee, in wei, would exceed `gas_limit`.
fn check_fee_limit(
	estimate_gas: u128,
	gas_price: u128,
	gas_limit: u128,
) -> Result<(), WalletError> {
	let transaction_fee_wei = estimate_gas.saturating_mul(gas_price);
	if transaction_fee_wei > gas_limit {
		return Err(WalletError::GasLimitExceeded(transaction_fee_wei, gas_limit));
	}
	Ok(())
}

#[async_trait::async_trait]
impl<P, T> WalletProvider for EthWallet<P, T>
where
	P: Provider<T, Ethereum> + Clone + Send + Sync + 'static,
	T: Transport + Clone + Send + Sync,
{
	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
		match self.signer_address {
			Some(address) => Ok(vec![address]),
			None => self
				.provider
				.get_accounts()
				.await
				.map_err(|err| WalletError::Transport(err.to_string())),
		}
	}

	async fn send_transaction(
		&self,
		contract: Address,
		call: ContractCall,
		from: Address,
	) -> Result<TransactionReceipt, WalletError> {
		let contract = PredictionOracle::new(contract, self.provider.clone());
		match call {
			ContractCall::RequestPrediction { content1, content2 } => {
				self.send_call(contract.requestPrediction(content1, content2).from(from)).await
			}
			ContractCall::StoreCid { cid } => {
				self.send_call(contract.storeCID(cid).from(from)).await
			}
		}
	}

	async fn subscribe(
		&self,
		contract: Address,
		event: EventKind,
		from_block: BlockPosition,
	) -> Result<EventStream, WalletError> {
		let contract = PredictionOracle::new(contract, self.provider.clone());
		let from_block = match from_block {
			BlockPosition::Latest => BlockNumberOrTag::Latest,
			BlockPosition::Number(number) => BlockNumberOrTag::Number(number),
		};
		let subscription_error = |err: alloy::transports::TransportError| {
			WalletError::Subscription(format!("failed to watch {event}: {err}"))
		};
		let decode_error =
			|err: alloy::sol_types::Error| WalletError::Subscription(err.to_string());

		let stream: EventStream = match event {
			EventKind::PredictionProcessed => {
				let poller = contract
					.PredictionProcessed_filter()
					.from_block(from_block)
					.watch()
					.await
					.map_err(subscription_error)?;
				Box::pin(poller.into_stream().map(move |res| {
					res.map(|(processed, _log)| ContractEvent::PredictionProcessed {
						processed_content: processed.processedContent,
					})
					.map_err(decode_error)
				}))
			}
			EventKind::PredictionRequested => {
				let poller = contract
					.PredictionRequested_filter()
					.from_block(from_block)
					.watch()
					.await
					.map_err(subscription_error)?;
				Box::pin(poller.into_stream().map(move |res| {
					res.map(|(requested, _log)| ContractEvent::PredictionRequested {
						requester: requested.requester,
						content: requested.content,
						content2: requested.content2,
					})
					.map_err(decode_error)
				}))
			}
			EventKind::CidStored => {
				let poller = contract
					.CIDStored_filter()
					.from_block(from_block)
					.watch()
					.await
					.map_err(subscription_error)?;
				Box::pin(poller.into_stream().map(move |res| {
					res.map(|(stored, _log)| ContractEvent::CidStored {
						uploader: stored.uploader,
						cid: stored.cid,
					})
					.map_err(decode_error)
				}))
			}
		};
		tracing::info!(%event, "watching contract event");
		Ok(stream)
	}

	async fn get_cids(&self, contract: Address) -> Result<Vec<String>, WalletError> {
		let contract = PredictionOracle::new(contract, self.provider.clone());
		let PredictionOracle::getCIDsReturn { _0: cids } = contract
			.getCIDs()
			.call()
			.await
			.map_err(|err| WalletError::Transport(err.to_string()))?;
		Ok(cids)
	}
}

/// Connects to the configured node and returns it as a wallet provider.
///
/// Returns `Ok(None)` when the node cannot be reached, the equivalent of no
/// wallet being installed. Malformed configuration is an error.
pub async fn connect_wallet(
	config: &Config,
) -> Result<Option<Arc<dyn WalletProvider>>, anyhow::Error> {
	let rpc_url = config.eth_connection.eth_rpc_connection_url();
	let gas_limit = u128::from(config.contract.gas_limit);

	let wallet: Arc<dyn WalletProvider> = match &config.contract.signer_private_key {
		Some(private_key) => {
			let signer: PrivateKeySigner =
				private_key.parse().context("Signer private key is not a valid key")?;
			let signer_address = signer.address();
			let provider = match ProviderBuilder::new()
				.with_recommended_fillers()
				.wallet(EthereumWallet::from(signer))
				.on_builtin(&rpc_url)
				.await
			{
				Ok(provider) => provider,
				Err(err) => {
					tracing::warn!("wallet provider unavailable at {rpc_url}: {err}");
					return Ok(None);
				}
			};
			if let Err(err) = provider.get_chain_id().await {
				tracing::warn!("wallet provider unavailable at {rpc_url}: {err}");
				return Ok(None);
			}
			Arc::new(EthWallet::new(provider, Some(signer_address), gas_limit))
		}
		None => {
			let provider =
				match ProviderBuilder::new().with_recommended_fillers().on_builtin(&rpc_url).await {
					Ok(provider) => provider,
					Err(err) => {
						tracing::warn!("wallet provider unavailable at {rpc_url}: {err}");
						return Ok(None);
					}
				};
			if let Err(err) = provider.get_chain_id().await {
				tracing::warn!("wallet provider unavailable at {rpc_url}: {err}");
				return Ok(None);
			}
			Arc::new(EthWallet::new(provider, None, gas_limit))
		}
	};

	tracing::info!("connected to wallet provider at {rpc_url}");
	Ok(Some(wallet))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fee_limit() {
		assert_eq!(check_fee_limit(21_000, 1_000_000_000, 10u128.pow(16)), Ok(()));
		assert_eq!(
			check_fee_limit(21_000, 10u128.pow(12), 10u128.pow(16)),
			Err(WalletError::GasLimitExceeded(21_000 * 10u128.pow(12), 10u128.pow(16)))
		);
		assert_eq!(
			check_fee_limit(u128::MAX, 2, 10u128.pow(16)),
			Err(WalletError::GasLimitExceeded(u128::MAX, 10u128.pow(16)))
		);
	}
}
