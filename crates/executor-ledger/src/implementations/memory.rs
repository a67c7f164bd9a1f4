//! In-memory token ledger implementation.
//!
//! This module provides a memory-based implementation of the TokenLedger
//! trait, standing in for the token contracts and the host ledger's
//! transactional semantics. Each token verifies EIP-2612-style permits
//! against its own domain (token name, version "1", chain id, token
//! address) and keeps per-owner permit nonces.
//!
//! Atomicity: `apply` stages every mutation on a clone of the token map
//! under a single write lock and swaps the clone in only if the whole
//! batch succeeded, so a failing transfer also discards any permit nonce
//! consumed earlier in the same batch.

use crate::{LedgerError, PermitCall, SettlementBatch, TokenLedger, TransferCall};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use executor_types::{current_timestamp, parse_token_amount, permit_signing_digest, TokenConfig};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Mutable state of one token contract.
#[derive(Debug, Clone, Default)]
struct TokenState {
	name: String,
	symbol: String,
	balances: HashMap<Address, U256>,
	/// allowances[(owner, spender)] = remaining amount.
	allowances: HashMap<(Address, Address), U256>,
	/// Next expected permit nonce per owner.
	nonces: HashMap<Address, U256>,
}

/// In-memory ledger implementation.
pub struct InMemoryLedger {
	/// Chain id bound into every token's permit domain.
	chain_id: u64,
	tokens: RwLock<HashMap<Address, TokenState>>,
}

impl InMemoryLedger {
	/// Creates an empty ledger for the given chain.
	pub fn new(chain_id: u64) -> Self {
		Self {
			chain_id,
			tokens: RwLock::new(HashMap::new()),
		}
	}

	/// Registers a token contract with the ledger.
	pub async fn register_token(&self, address: Address, name: &str, symbol: &str) {
		let mut tokens = self.tokens.write().await;
		tokens.entry(address).or_insert_with(|| TokenState {
			name: name.to_string(),
			symbol: symbol.to_string(),
			..TokenState::default()
		});
	}

	/// Credits `holder` with `amount` of `token`. Seeding only; real token
	/// supply management is outside the executor's scope.
	pub async fn mint(
		&self,
		token: &Address,
		holder: &Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		let mut tokens = self.tokens.write().await;
		let state = tokens
			.get_mut(token)
			.ok_or(LedgerError::UnknownToken(*token))?;
		let balance = state.balances.entry(*holder).or_default();
		*balance += amount;
		Ok(())
	}

	fn apply_permit(
		chain_id: u64,
		tokens: &mut HashMap<Address, TokenState>,
		call: &PermitCall,
		now: u64,
	) -> Result<(), LedgerError> {
		let state = tokens
			.get_mut(&call.token)
			.ok_or(LedgerError::UnknownToken(call.token))?;
		let permit = &call.permit;

		if U256::from(now) > permit.deadline {
			return Err(LedgerError::PermitRejected {
				owner: permit.owner,
				reason: format!("deadline {} has passed", permit.deadline),
			});
		}

		let expected = state.nonces.get(&permit.owner).copied().unwrap_or_default();
		if permit.nonce != expected {
			return Err(LedgerError::PermitRejected {
				owner: permit.owner,
				reason: format!("nonce mismatch: expected {}, got {}", expected, permit.nonce),
			});
		}

		let digest = permit_signing_digest(&state.name, chain_id, &call.token, permit);
		let recovered =
			call.signature
				.recover(&digest)
				.map_err(|e| LedgerError::PermitRejected {
					owner: permit.owner,
					reason: format!("signature invalid: {}", e),
				})?;
		if recovered != permit.owner {
			return Err(LedgerError::PermitRejected {
				owner: permit.owner,
				reason: format!("signer {} is not the owner", recovered),
			});
		}

		state
			.allowances
			.insert((permit.owner, permit.spender), permit.value);
		state.nonces.insert(permit.owner, expected + U256::from(1));
		tracing::debug!(
			token = %state.symbol,
			owner = %permit.owner,
			spender = %permit.spender,
			value = %permit.value,
			"Consumed permit"
		);
		Ok(())
	}

	fn apply_transfer(
		tokens: &mut HashMap<Address, TokenState>,
		call: &TransferCall,
	) -> Result<(), LedgerError> {
		let state = tokens
			.get_mut(&call.token)
			.ok_or(LedgerError::UnknownToken(call.token))?;

		let allowance_key = (call.from, call.spender);
		let allowance = state
			.allowances
			.get(&allowance_key)
			.copied()
			.unwrap_or_default();
		if allowance < call.amount {
			return Err(LedgerError::InsufficientAllowance {
				token: call.token,
				owner: call.from,
				spender: call.spender,
				required: call.amount,
				available: allowance,
			});
		}

		let from_balance = state.balances.get(&call.from).copied().unwrap_or_default();
		if from_balance < call.amount {
			return Err(LedgerError::InsufficientBalance {
				token: call.token,
				holder: call.from,
				required: call.amount,
				available: from_balance,
			});
		}

		state.allowances.insert(allowance_key, allowance - call.amount);
		state.balances.insert(call.from, from_balance - call.amount);
		let to_balance = state.balances.entry(call.to).or_default();
		*to_balance += call.amount;
		Ok(())
	}
}

#[async_trait]
impl TokenLedger for InMemoryLedger {
	async fn token_exists(&self, token: &Address) -> bool {
		self.tokens.read().await.contains_key(token)
	}

	async fn balance_of(&self, token: &Address, holder: &Address) -> Result<U256, LedgerError> {
		let tokens = self.tokens.read().await;
		let state = tokens.get(token).ok_or(LedgerError::UnknownToken(*token))?;
		Ok(state.balances.get(holder).copied().unwrap_or_default())
	}

	async fn allowance(
		&self,
		token: &Address,
		owner: &Address,
		spender: &Address,
	) -> Result<U256, LedgerError> {
		let tokens = self.tokens.read().await;
		let state = tokens.get(token).ok_or(LedgerError::UnknownToken(*token))?;
		Ok(state
			.allowances
			.get(&(*owner, *spender))
			.copied()
			.unwrap_or_default())
	}

	async fn nonce_of(&self, token: &Address, owner: &Address) -> Result<U256, LedgerError> {
		let tokens = self.tokens.read().await;
		let state = tokens.get(token).ok_or(LedgerError::UnknownToken(*token))?;
		Ok(state.nonces.get(owner).copied().unwrap_or_default())
	}

	async fn apply(&self, batch: SettlementBatch) -> Result<(), LedgerError> {
		let mut tokens = self.tokens.write().await;
		let mut staged = tokens.clone();
		let now = current_timestamp();

		for permit in &batch.permits {
			Self::apply_permit(self.chain_id, &mut staged, permit, now)?;
		}
		for transfer in &batch.transfers {
			Self::apply_transfer(&mut staged, transfer)?;
		}

		*tokens = staged;
		Ok(())
	}
}

/// Factory function to create an in-memory ledger from token configuration.
///
/// Registers every configured token and credits the configured initial
/// balances.
pub async fn create_ledger(
	chain_id: u64,
	tokens: &[TokenConfig],
) -> Result<InMemoryLedger, LedgerError> {
	let ledger = InMemoryLedger::new(chain_id);
	for token in tokens {
		ledger
			.register_token(token.address, &token.name, &token.symbol)
			.await;
		for balance in &token.balances {
			let amount =
				parse_token_amount(&balance.amount).map_err(LedgerError::Configuration)?;
			ledger.mint(&token.address, &balance.holder, amount).await?;
		}
	}
	Ok(ledger)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_signer::SignerSync;
	use alloy_signer_local::PrivateKeySigner;
	use executor_types::{Permit, Signature};

	const CHAIN_ID: u64 = 31337;

	async fn ledger_with_token(token: Address) -> InMemoryLedger {
		let ledger = InMemoryLedger::new(CHAIN_ID);
		ledger.register_token(token, "Token One", "TK1").await;
		ledger
	}

	fn signed_permit(
		signer: &PrivateKeySigner,
		token: &Address,
		spender: Address,
		value: U256,
		nonce: U256,
		deadline: U256,
	) -> PermitCall {
		let permit = Permit {
			owner: signer.address(),
			spender,
			value,
			nonce,
			deadline,
		};
		let digest = permit_signing_digest("Token One", CHAIN_ID, token, &permit);
		let signature: Signature = signer.sign_hash_sync(&digest).unwrap().into();
		PermitCall {
			token: *token,
			permit,
			signature,
		}
	}

	fn far_deadline() -> U256 {
		U256::from(current_timestamp() + 1000)
	}

	#[tokio::test]
	async fn test_transfer_with_allowance() {
		let token = Address::repeat_byte(0xaa);
		let ledger = ledger_with_token(token).await;
		let owner = PrivateKeySigner::random();
		let counterparty = Address::repeat_byte(0x02);
		let spender = Address::repeat_byte(0x42);

		ledger.mint(&token, &owner.address(), U256::from(100u64)).await.unwrap();

		let batch = SettlementBatch {
			permits: vec![signed_permit(
				&owner,
				&token,
				spender,
				U256::from(60u64),
				U256::ZERO,
				far_deadline(),
			)],
			transfers: vec![TransferCall {
				token,
				from: owner.address(),
				to: counterparty,
				amount: U256::from(60u64),
				spender,
			}],
		};
		ledger.apply(batch).await.unwrap();

		assert_eq!(
			ledger.balance_of(&token, &owner.address()).await.unwrap(),
			U256::from(40u64)
		);
		assert_eq!(
			ledger.balance_of(&token, &counterparty).await.unwrap(),
			U256::from(60u64)
		);
		assert_eq!(
			ledger
				.allowance(&token, &owner.address(), &spender)
				.await
				.unwrap(),
			U256::ZERO
		);
		assert_eq!(
			ledger.nonce_of(&token, &owner.address()).await.unwrap(),
			U256::from(1u64)
		);
	}

	#[tokio::test]
	async fn test_permit_replay_rejected() {
		let token = Address::repeat_byte(0xaa);
		let ledger = ledger_with_token(token).await;
		let owner = PrivateKeySigner::random();
		let spender = Address::repeat_byte(0x42);

		let permit = signed_permit(
			&owner,
			&token,
			spender,
			U256::from(10u64),
			U256::ZERO,
			far_deadline(),
		);

		ledger
			.apply(SettlementBatch {
				permits: vec![permit.clone()],
				transfers: vec![],
			})
			.await
			.unwrap();

		// Same permit again: the nonce was consumed.
		let err = ledger
			.apply(SettlementBatch {
				permits: vec![permit],
				transfers: vec![],
			})
			.await
			.unwrap_err();
		assert!(matches!(err, LedgerError::PermitRejected { .. }));
	}

	#[tokio::test]
	async fn test_permit_deadline_enforced() {
		let token = Address::repeat_byte(0xaa);
		let ledger = ledger_with_token(token).await;
		let owner = PrivateKeySigner::random();

		let expired = signed_permit(
			&owner,
			&token,
			Address::repeat_byte(0x42),
			U256::from(10u64),
			U256::ZERO,
			U256::from(current_timestamp() - 10),
		);
		let err = ledger
			.apply(SettlementBatch {
				permits: vec![expired],
				transfers: vec![],
			})
			.await
			.unwrap_err();
		assert!(matches!(err, LedgerError::PermitRejected { .. }));
	}

	#[tokio::test]
	async fn test_permit_wrong_signer_rejected() {
		let token = Address::repeat_byte(0xaa);
		let ledger = ledger_with_token(token).await;
		let owner = PrivateKeySigner::random();
		let forger = PrivateKeySigner::random();

		// Permit claims `owner` but is signed by `forger`.
		let permit = Permit {
			owner: owner.address(),
			spender: Address::repeat_byte(0x42),
			value: U256::from(10u64),
			nonce: U256::ZERO,
			deadline: far_deadline(),
		};
		let digest = permit_signing_digest("Token One", CHAIN_ID, &token, &permit);
		let signature: Signature = forger.sign_hash_sync(&digest).unwrap().into();

		let err = ledger
			.apply(SettlementBatch {
				permits: vec![PermitCall {
					token,
					permit,
					signature,
				}],
				transfers: vec![],
			})
			.await
			.unwrap_err();
		assert!(matches!(err, LedgerError::PermitRejected { .. }));
	}

	#[tokio::test]
	async fn test_transfer_without_allowance_rejected() {
		let token = Address::repeat_byte(0xaa);
		let ledger = ledger_with_token(token).await;
		let holder = Address::repeat_byte(0x01);
		ledger.mint(&token, &holder, U256::from(100u64)).await.unwrap();

		let err = ledger
			.apply(SettlementBatch {
				permits: vec![],
				transfers: vec![TransferCall {
					token,
					from: holder,
					to: Address::repeat_byte(0x02),
					amount: U256::from(1u64),
					spender: Address::repeat_byte(0x42),
				}],
			})
			.await
			.unwrap_err();
		assert!(matches!(err, LedgerError::InsufficientAllowance { .. }));
	}

	#[tokio::test]
	async fn test_failed_batch_leaves_no_effects() {
		let token = Address::repeat_byte(0xaa);
		let ledger = ledger_with_token(token).await;
		let owner = PrivateKeySigner::random();
		let spender = Address::repeat_byte(0x42);

		// Allowance will be granted by the permit, but the owner holds
		// nothing, so the transfer must fail and roll the permit back.
		let batch = SettlementBatch {
			permits: vec![signed_permit(
				&owner,
				&token,
				spender,
				U256::from(10u64),
				U256::ZERO,
				far_deadline(),
			)],
			transfers: vec![TransferCall {
				token,
				from: owner.address(),
				to: Address::repeat_byte(0x02),
				amount: U256::from(10u64),
				spender,
			}],
		};
		let err = ledger.apply(batch).await.unwrap_err();
		assert!(matches!(err, LedgerError::InsufficientBalance { .. }));

		// The staged permit nonce and allowance were discarded with it.
		assert_eq!(
			ledger.nonce_of(&token, &owner.address()).await.unwrap(),
			U256::ZERO
		);
		assert_eq!(
			ledger
				.allowance(&token, &owner.address(), &spender)
				.await
				.unwrap(),
			U256::ZERO
		);
	}

	#[tokio::test]
	async fn test_create_ledger_from_config() {
		use executor_types::TokenBalance;

		let holder = Address::repeat_byte(0x07);
		let config = vec![TokenConfig {
			address: Address::repeat_byte(0xaa),
			name: "Token One".to_string(),
			symbol: "TK1".to_string(),
			decimals: 18,
			balances: vec![TokenBalance {
				holder,
				amount: "1000".to_string(),
			}],
		}];

		let ledger = create_ledger(CHAIN_ID, &config).await.unwrap();
		assert!(ledger.token_exists(&Address::repeat_byte(0xaa)).await);
		assert_eq!(
			ledger
				.balance_of(&Address::repeat_byte(0xaa), &holder)
				.await
				.unwrap(),
			U256::from(1000u64)
		);
	}
}
