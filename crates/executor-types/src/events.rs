//! Settlement record types.
//!
//! A successful settlement emits exactly one record. Records are
//! append-only and externally observable; consumers subscribe through the
//! settlement event bus and assert on the fields directly.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// The externally observable outcome of one settled order pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
	/// Originator of the buy order.
	pub buyer: Address,
	/// Originator of the sell order.
	pub seller: Address,
	/// Token the buyer paid (the buy order's out leg).
	pub buyer_token: Address,
	/// Amount of `buyer_token` moved buyer -> seller.
	pub buyer_amount: U256,
	/// Token the seller paid (the sell order's out leg).
	pub seller_token: Address,
	/// Amount of `seller_token` moved seller -> buyer.
	pub seller_amount: U256,
	/// EIP-712 digest of the consumed buy order.
	pub buy_order_digest: B256,
	/// EIP-712 digest of the consumed sell order.
	pub sell_order_digest: B256,
	/// Unix timestamp at which the settlement committed.
	pub timestamp: u64,
}
