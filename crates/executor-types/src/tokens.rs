//! Token configuration types.
//!
//! Tokens are external collaborators: the executor only ever sees them
//! through the whitelist and the ledger. These types describe the tokens a
//! deployment trades and the initial balance distribution the in-memory
//! ledger is seeded with.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// One tradeable token and its initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
	/// Token contract address; also the permit domain's verifying contract.
	pub address: Address,
	/// Token name; bound into the permit domain.
	pub name: String,
	/// Display symbol.
	pub symbol: String,
	/// Decimal places.
	pub decimals: u8,
	/// Initial holder balances.
	#[serde(default)]
	pub balances: Vec<TokenBalance>,
}

/// An initial balance entry for one holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
	pub holder: Address,
	/// Amount as a decimal or 0x-prefixed hex string; TOML integers are
	/// too small for 18-decimal token quantities.
	pub amount: String,
}

/// Parses a configured token amount (decimal or 0x-prefixed hex).
pub fn parse_token_amount(amount: &str) -> Result<U256, String> {
	amount
		.parse::<U256>()
		.map_err(|e| format!("invalid token amount '{}': {}", amount, e))
}
