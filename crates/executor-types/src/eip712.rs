//! Generic EIP-712 utilities shared across the executor.
//!
//! These helpers provide:
//! - Domain separator computation
//! - Final digest computation (0x1901 || domainSeparator || structHash)
//! - A minimal ABI encoder for the static EIP-712 field types in use

use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

/// EIP-712 domain type string. Both the executor domain and each token's
/// permit domain carry a name, version, chain id and verifying contract,
/// so signatures never validate outside the deployment they were made for.
pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Protocol name bound into the executor's domain separator.
pub const PROTOCOL_NAME: &str = "OrderBookExecutor";
/// Protocol version bound into the executor's domain separator.
pub const PROTOCOL_VERSION: &str = "1";

/// Compute an EIP-712 domain separator:
/// keccak256(abi.encode(typeHash, nameHash, versionHash, chainId, verifyingContract)).
pub fn compute_domain_separator(
	name: &str,
	version: &str,
	chain_id: u64,
	verifying_contract: &Address,
) -> B256 {
	let domain_type_hash = keccak256(DOMAIN_TYPE.as_bytes());
	let name_hash = keccak256(name.as_bytes());
	let version_hash = keccak256(version.as_bytes());
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&domain_type_hash);
	enc.push_b256(&name_hash);
	enc.push_b256(&version_hash);
	enc.push_u256(U256::from(chain_id));
	enc.push_address(verifying_contract);
	keccak256(enc.finish())
}

/// Compute the final EIP-712 digest: keccak256(0x1901 || domainSeparator || structHash).
pub fn compute_final_digest(domain_separator: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_separator.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// The executor deployment's own domain separator.
///
/// Derived once from the immutable deployment parameters; two deployments,
/// or the same deployment on two chains, never share a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSeparator(pub B256);

impl DomainSeparator {
	/// Derives the separator for an executor deployed at `executor_address`
	/// on the chain identified by `chain_id`.
	pub fn new(chain_id: u64, executor_address: &Address) -> Self {
		Self(compute_domain_separator(
			PROTOCOL_NAME,
			PROTOCOL_VERSION,
			chain_id,
			executor_address,
		))
	}

	/// Combines this separator with a struct hash into the signing digest.
	pub fn digest(&self, struct_hash: &B256) -> B256 {
		compute_final_digest(&self.0, struct_hash)
	}
}

/// Minimal ABI encoder for static types used in EIP-712 struct hashing.
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Default for Eip712AbiEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self { buf: Vec::new() }
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u64(&mut self, v: u64) {
		let mut word = [0u8; 32];
		word[24..].copy_from_slice(&v.to_be_bytes());
		self.buf.extend_from_slice(&word);
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_domain_separator_is_deterministic() {
		let executor = Address::repeat_byte(0x42);
		let a = DomainSeparator::new(1, &executor);
		let b = DomainSeparator::new(1, &executor);
		assert_eq!(a, b);
	}

	#[test]
	fn test_domain_separator_differs_per_chain_and_address() {
		let executor = Address::repeat_byte(0x42);
		let other = Address::repeat_byte(0x43);
		let mainnet = DomainSeparator::new(1, &executor);
		assert_ne!(mainnet, DomainSeparator::new(5, &executor));
		assert_ne!(mainnet, DomainSeparator::new(1, &other));
	}

	#[test]
	fn test_encoder_pads_static_types_to_words() {
		let mut enc = Eip712AbiEncoder::new();
		enc.push_address(&Address::repeat_byte(0x11));
		enc.push_u64(7);
		let out = enc.finish();
		assert_eq!(out.len(), 64);
		// Address occupies the low 20 bytes of its word.
		assert_eq!(&out[..12], &[0u8; 12]);
		assert_eq!(out[12], 0x11);
		// u64 occupies the low 8 bytes of its word.
		assert_eq!(&out[32..56], &[0u8; 24]);
		assert_eq!(out[63], 7);
	}
}
