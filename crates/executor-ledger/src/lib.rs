//! Token ledger module for the order book executor.
//!
//! The executor never owns token state: balances, allowances and permit
//! nonces belong to the host ledger, reached through the interface defined
//! here. The one operation with settlement semantics is [`TokenLedger::apply`],
//! which consumes a batch of permit and transfer calls as a unit — either
//! every call succeeds and the batch commits, or the ledger is left
//! untouched.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use executor_types::{Permit, Signature};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
	/// The token contract is not known to the ledger.
	#[error("unknown token: {0}")]
	UnknownToken(Address),
	/// A transfer exceeds the payer's balance.
	#[error("insufficient balance on {token}: {holder} holds {available}, needs {required}")]
	InsufficientBalance {
		token: Address,
		holder: Address,
		required: U256,
		available: U256,
	},
	/// A transfer exceeds the allowance granted to the spender.
	#[error(
		"insufficient allowance on {token}: {owner} granted {available} to {spender}, needs {required}"
	)]
	InsufficientAllowance {
		token: Address,
		owner: Address,
		spender: Address,
		required: U256,
		available: U256,
	},
	/// The token rejected a permit (deadline, nonce or signature).
	#[error("permit rejected for {owner}: {reason}")]
	PermitRejected { owner: Address, reason: String },
	/// The ledger could not be built from configuration.
	#[error("ledger configuration error: {0}")]
	Configuration(String),
}

/// A permit submission destined for one token contract.
#[derive(Debug, Clone)]
pub struct PermitCall {
	/// Token that verifies and consumes the permit.
	pub token: Address,
	pub permit: Permit,
	pub signature: Signature,
}

/// An allowance-backed transfer executed on behalf of `spender`.
#[derive(Debug, Clone)]
pub struct TransferCall {
	pub token: Address,
	pub from: Address,
	pub to: Address,
	pub amount: U256,
	/// Account whose allowance from `from` is consumed.
	pub spender: Address,
}

/// An ordered batch of ledger mutations applied all-or-nothing.
///
/// Permits are consumed before transfers so a freshly granted allowance
/// backs the transfer that needs it.
#[derive(Debug, Clone, Default)]
pub struct SettlementBatch {
	pub permits: Vec<PermitCall>,
	pub transfers: Vec<TransferCall>,
}

/// Trait defining the interface to the host ledger's token state.
///
/// Query methods observe committed state only. [`TokenLedger::apply`] is the single
/// transactional boundary: implementations must guarantee that a failed
/// batch leaves no observable effect, including consumed permit nonces.
#[async_trait]
pub trait TokenLedger: Send + Sync {
	/// Whether the ledger tracks `token` at all.
	async fn token_exists(&self, token: &Address) -> bool;

	/// Committed balance of `holder` on `token`.
	async fn balance_of(&self, token: &Address, holder: &Address) -> Result<U256, LedgerError>;

	/// Committed allowance granted by `owner` to `spender` on `token`.
	async fn allowance(
		&self,
		token: &Address,
		owner: &Address,
		spender: &Address,
	) -> Result<U256, LedgerError>;

	/// The next permit nonce the token expects from `owner`.
	async fn nonce_of(&self, token: &Address, owner: &Address) -> Result<U256, LedgerError>;

	/// Applies `batch` atomically: all permits and transfers, or nothing.
	async fn apply(&self, batch: SettlementBatch) -> Result<(), LedgerError>;
}
