//! Permit-style allowance authorizations.
//!
//! A permit is a single-use message signed by a token holder that the
//! token contract consumes to grant a transfer allowance without a prior
//! approval transaction. The schema and domain construction follow the
//! EIP-2612 convention: each token verifies permits against its own
//! domain, keyed by the token's name and contract address.

use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::eip712::{compute_domain_separator, compute_final_digest, Eip712AbiEncoder};
use crate::signature::Signature;

/// EIP-712 type string for permits (EIP-2612 schema).
pub const PERMIT_TYPE: &str =
	"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

/// Version string tokens bind into their permit domain.
pub const PERMIT_DOMAIN_VERSION: &str = "1";

/// A signed, single-use authorization to set `allowance[owner][spender] = value`.
///
/// The token consumes the owner's current nonce on success; replaying the
/// same permit afterwards fails on the nonce check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
	/// Token holder granting the allowance.
	pub owner: Address,
	/// Account being authorized to transfer.
	pub spender: Address,
	/// Allowance to establish.
	pub value: U256,
	/// The owner's expected permit nonce on the token.
	pub nonce: U256,
	/// Unix timestamp after which the token rejects the permit.
	pub deadline: U256,
}

impl Permit {
	/// Computes the EIP-712 struct hash of this permit.
	pub fn struct_hash(&self) -> B256 {
		let type_hash = keccak256(PERMIT_TYPE.as_bytes());
		let mut enc = Eip712AbiEncoder::new();
		enc.push_b256(&type_hash);
		enc.push_address(&self.owner);
		enc.push_address(&self.spender);
		enc.push_u256(self.value);
		enc.push_u256(self.nonce);
		enc.push_u256(self.deadline);
		keccak256(enc.finish())
	}
}

/// A permit together with the owner's signature over it, as submitted by
/// the relayer alongside a settlement call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPermit {
	pub permit: Permit,
	pub signature: Signature,
}

/// Computes the digest an owner signs for a permit on a given token.
///
/// The verifying contract is the token itself, so a permit for one token
/// never validates on another.
pub fn permit_signing_digest(
	token_name: &str,
	chain_id: u64,
	token: &Address,
	permit: &Permit,
) -> B256 {
	let domain = compute_domain_separator(token_name, PERMIT_DOMAIN_VERSION, chain_id, token);
	compute_final_digest(&domain, &permit.struct_hash())
}
