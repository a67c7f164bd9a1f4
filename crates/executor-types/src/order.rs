//! The signed order payload.
//!
//! An order is a value object signed off-chain by its originator. It is
//! never stored; it exists only for the duration of one settlement call,
//! passed alongside its detached signature.

use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::eip712::{DomainSeparator, Eip712AbiEncoder};

/// EIP-712 type string for orders. Field order and types are fixed; signer
/// and verifier must agree byte-for-byte or every signature is rejected.
pub const ORDER_TYPE: &str =
	"Order(address from,address tokenOut,uint256 amountOut,address tokenIn,uint256 amountIn,uint64 expiration)";

/// A declaration of a desired token-for-token exchange, signed by `from`.
///
/// `token_out`/`amount_out` is the leg the originator gives up,
/// `token_in`/`amount_in` the leg they expect to receive. Wire field names
/// follow the signing schema (`tokenOut`, `amountOut`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Account that created and signed this order.
	pub from: Address,
	/// Token the originator pays.
	pub token_out: Address,
	/// Amount of `token_out` the originator pays.
	pub amount_out: U256,
	/// Token the originator expects to receive.
	pub token_in: Address,
	/// Amount of `token_in` the originator expects to receive.
	pub amount_in: U256,
	/// Unix timestamp after which the order is invalid.
	pub expiration: u64,
}

impl Order {
	/// Computes the EIP-712 struct hash of this order.
	pub fn struct_hash(&self) -> B256 {
		let type_hash = keccak256(ORDER_TYPE.as_bytes());
		let mut enc = Eip712AbiEncoder::new();
		enc.push_b256(&type_hash);
		enc.push_address(&self.from);
		enc.push_address(&self.token_out);
		enc.push_u256(self.amount_out);
		enc.push_address(&self.token_in);
		enc.push_u256(self.amount_in);
		enc.push_u64(self.expiration);
		keccak256(enc.finish())
	}

	/// Computes the digest the originator signs: the struct hash combined
	/// with the executor's domain separator.
	pub fn signing_digest(&self, domain: &DomainSeparator) -> B256 {
		domain.digest(&self.struct_hash())
	}

	/// Whether the order is past its expiration at `now`.
	pub fn is_expired(&self, now: u64) -> bool {
		now > self.expiration
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_order() -> Order {
		Order {
			from: Address::repeat_byte(0x01),
			token_out: Address::repeat_byte(0xaa),
			amount_out: U256::from(50u64),
			token_in: Address::repeat_byte(0xbb),
			amount_in: U256::from(100u64),
			expiration: 1_700_000_000,
		}
	}

	#[test]
	fn test_struct_hash_changes_with_any_field() {
		let base = sample_order();
		let mut other = base.clone();
		other.amount_out = U256::from(51u64);
		assert_ne!(base.struct_hash(), other.struct_hash());

		let mut other = base.clone();
		other.expiration += 1;
		assert_ne!(base.struct_hash(), other.struct_hash());
	}

	#[test]
	fn test_signing_digest_is_domain_bound() {
		let order = sample_order();
		let executor = Address::repeat_byte(0x42);
		let d1 = DomainSeparator::new(1, &executor);
		let d31337 = DomainSeparator::new(31337, &executor);
		assert_ne!(order.signing_digest(&d1), order.signing_digest(&d31337));
	}

	#[test]
	fn test_expiration_boundary_is_inclusive() {
		let order = sample_order();
		assert!(!order.is_expired(order.expiration));
		assert!(order.is_expired(order.expiration + 1));
	}

	#[test]
	fn test_wire_field_names_match_signing_schema() {
		let json = serde_json::to_value(sample_order()).unwrap();
		for key in ["from", "tokenOut", "amountOut", "tokenIn", "amountIn", "expiration"] {
			assert!(json.get(key).is_some(), "missing wire field {key}");
		}
	}
}
