//! Settlement module for the order book executor.
//!
//! This module carries the settlement core: validation of a matched
//! buy/sell order pair, the privileged `execute_orders` entry point that
//! settles the pair atomically against the token ledger, and the event
//! bus on which settlement records are published.
//!
//! Every failure aborts the entire settlement call with no partial
//! effects; nothing is retried. Each error names the order and check
//! that failed so the relayer can diagnose and resubmit.

use alloy_primitives::{Address, U256};
use executor_ledger::LedgerError;
use executor_types::SignatureError;
use std::fmt;
use thiserror::Error;

pub mod event_bus;
pub mod executor;
pub mod validation;

pub use event_bus::EventBus;
pub use executor::{SettlementExecutor, SettlementRequest};
pub use validation::{validate_pair, ValidatedPair};

/// Which of the two submitted orders a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
	Buy,
	Sell,
}

impl fmt::Display for OrderSide {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderSide::Buy => write!(f, "buy"),
			OrderSide::Sell => write!(f, "sell"),
		}
	}
}

/// Errors that can occur during settlement operations.
#[derive(Debug, Error)]
pub enum SettlementError {
	/// The caller does not hold the relayer privilege.
	#[error("caller {0} does not hold the relayer privilege")]
	Unauthorized(Address),
	/// A signature failed encoding validation or ECDSA recovery.
	#[error("malformed {side} order signature: {source}")]
	MalformedSignature {
		side: OrderSide,
		#[source]
		source: SignatureError,
	},
	/// The recovered signer is not the claimed originator.
	#[error("{side} order signer mismatch: order claims {expected}, signature recovers {recovered}")]
	SignatureMismatch {
		side: OrderSide,
		expected: Address,
		recovered: Address,
	},
	/// The order is past its expiration.
	#[error("{side} order expired at {expiration}, now {now}")]
	OrderExpired {
		side: OrderSide,
		expiration: u64,
		now: u64,
	},
	/// The two orders do not describe the same exchange.
	#[error("orders are not complementary: {reason}")]
	OrdersIncompatible { reason: String },
	/// A traded token is not on the whitelist.
	#[error("token {0} is not whitelisted for trading")]
	TokenNotWhitelisted(Address),
	/// The order digest was already consumed by a previous settlement.
	#[error("{side} order was already settled")]
	OrderAlreadySettled { side: OrderSide },
	/// The token rejected a submitted permit.
	#[error("permit rejected for {owner}: {reason}")]
	PermitRejected { owner: Address, reason: String },
	/// A paying party has not granted the executor enough allowance.
	#[error("insufficient allowance on {token}: {owner} granted {available}, needs {required}")]
	InsufficientAllowance {
		token: Address,
		owner: Address,
		required: U256,
		available: U256,
	},
	/// The ledger refused a transfer leg.
	#[error("transfer failed on {token}: {reason}")]
	TransferFailed { token: Address, reason: String },
}

impl From<LedgerError> for SettlementError {
	fn from(err: LedgerError) -> Self {
		match err {
			LedgerError::PermitRejected { owner, reason } => {
				SettlementError::PermitRejected { owner, reason }
			}
			LedgerError::InsufficientAllowance {
				token,
				owner,
				required,
				available,
				..
			} => SettlementError::InsufficientAllowance {
				token,
				owner,
				required,
				available,
			},
			LedgerError::InsufficientBalance {
				token,
				holder,
				required,
				available,
			} => SettlementError::TransferFailed {
				token,
				reason: format!("{} holds {}, needs {}", holder, available, required),
			},
			LedgerError::UnknownToken(token) => SettlementError::TransferFailed {
				token,
				reason: "token unknown to the ledger".to_string(),
			},
			LedgerError::Configuration(reason) => SettlementError::TransferFailed {
				token: Address::ZERO,
				reason,
			},
		}
	}
}
