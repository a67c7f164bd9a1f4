//! Detached ECDSA signatures over EIP-712 digests.
//!
//! Signature components are validated before recovery: secp256k1 recovery
//! happily returns a non-zero address for garbage input, so encoding and
//! recovery-id checks must come first. Recovery itself never panics;
//! callers compare the recovered address against the claimed originator.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eip712::DomainSeparator;
use crate::order::Order;

/// Errors produced while decoding or recovering a signature.
#[derive(Debug, Error)]
pub enum SignatureError {
	/// The signature blob is not 65 bytes.
	#[error("invalid signature length: expected 65 bytes, got {0}")]
	InvalidLength(usize),
	/// The recovery id is not 27/28 (or 0/1 before normalization).
	#[error("invalid recovery id: {0}")]
	InvalidRecoveryId(u8),
	/// The curve rejected the signature during recovery.
	#[error("ecdsa recovery failed: {0}")]
	Recovery(String),
}

/// Wire form of a detached signature: the r and s scalars plus the
/// recovery id `v` (27 or 28; 0/1 are normalized on construction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
	pub r: B256,
	pub s: B256,
	pub v: u8,
}

impl Signature {
	/// Parses the canonical 65-byte `r || s || v` encoding.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
		if bytes.len() != 65 {
			return Err(SignatureError::InvalidLength(bytes.len()));
		}
		let sig = Self {
			r: B256::from_slice(&bytes[..32]),
			s: B256::from_slice(&bytes[32..64]),
			v: bytes[64],
		};
		// Reject bad recovery ids at the boundary.
		sig.normalized_v()?;
		Ok(sig)
	}

	/// Serializes back to the 65-byte `r || s || v` encoding.
	pub fn to_bytes(&self) -> [u8; 65] {
		let mut out = [0u8; 65];
		out[..32].copy_from_slice(self.r.as_slice());
		out[32..64].copy_from_slice(self.s.as_slice());
		out[64] = self.v;
		out
	}

	/// Returns `v` normalized to 27/28, or an error for any other value.
	pub fn normalized_v(&self) -> Result<u8, SignatureError> {
		match self.v {
			0 | 1 => Ok(self.v + 27),
			27 | 28 => Ok(self.v),
			other => Err(SignatureError::InvalidRecoveryId(other)),
		}
	}

	/// Recovers the signing address from a prehashed digest.
	pub fn recover(&self, digest: &B256) -> Result<Address, SignatureError> {
		let v = self.normalized_v()?;
		let sig = alloy_primitives::Signature::from_rs_and_parity(
			U256::from_be_bytes(self.r.0),
			U256::from_be_bytes(self.s.0),
			v as u64,
		)
		.map_err(|e| SignatureError::Recovery(e.to_string()))?;
		sig.recover_address_from_prehash(digest)
			.map_err(|e| SignatureError::Recovery(e.to_string()))
	}
}

impl From<alloy_primitives::PrimitiveSignature> for Signature {
	fn from(sig: alloy_primitives::PrimitiveSignature) -> Self {
		Self {
			r: B256::from(sig.r().to_be_bytes::<32>()),
			s: B256::from(sig.s().to_be_bytes::<32>()),
			v: 27 + sig.v() as u8,
		}
	}
}

/// Recovers the account that signed `order` under the executor's domain.
///
/// Returns the recovered address; it is the caller's job to compare it
/// against `order.from`.
pub fn recover_order_signer(
	order: &Order,
	signature: &Signature,
	domain: &DomainSeparator,
) -> Result<Address, SignatureError> {
	signature.recover(&order.signing_digest(domain))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_signer::SignerSync;
	use alloy_signer_local::PrivateKeySigner;

	fn sample_order(from: Address) -> Order {
		Order {
			from,
			token_out: Address::repeat_byte(0xaa),
			amount_out: U256::from(50u64),
			token_in: Address::repeat_byte(0xbb),
			amount_in: U256::from(100u64),
			expiration: 1_700_000_000,
		}
	}

	#[test]
	fn test_sign_and_recover_round_trip() {
		let signer = PrivateKeySigner::random();
		let order = sample_order(signer.address());
		let domain = DomainSeparator::new(31337, &Address::repeat_byte(0x42));

		let digest = order.signing_digest(&domain);
		let sig: Signature = signer.sign_hash_sync(&digest).unwrap().into();

		let recovered = recover_order_signer(&order, &sig, &domain).unwrap();
		assert_eq!(recovered, signer.address());
	}

	#[test]
	fn test_recovery_under_wrong_domain_yields_different_signer() {
		let signer = PrivateKeySigner::random();
		let order = sample_order(signer.address());
		let executor = Address::repeat_byte(0x42);
		let domain = DomainSeparator::new(1, &executor);
		let other_chain = DomainSeparator::new(5, &executor);

		let sig: Signature = signer
			.sign_hash_sync(&order.signing_digest(&domain))
			.unwrap()
			.into();

		let recovered = recover_order_signer(&order, &sig, &other_chain).unwrap();
		assert_ne!(recovered, signer.address());
	}

	#[test]
	fn test_from_bytes_rejects_wrong_length() {
		let err = Signature::from_bytes(&[0u8; 64]).unwrap_err();
		assert!(matches!(err, SignatureError::InvalidLength(64)));
	}

	#[test]
	fn test_from_bytes_rejects_bad_recovery_id() {
		let mut bytes = [0u8; 65];
		bytes[64] = 29;
		let err = Signature::from_bytes(&bytes).unwrap_err();
		assert!(matches!(err, SignatureError::InvalidRecoveryId(29)));
	}

	#[test]
	fn test_v_normalization() {
		let sig = Signature {
			r: B256::repeat_byte(1),
			s: B256::repeat_byte(2),
			v: 0,
		};
		assert_eq!(sig.normalized_v().unwrap(), 27);
		let sig = Signature { v: 28, ..sig };
		assert_eq!(sig.normalized_v().unwrap(), 28);
	}

	#[test]
	fn test_round_trip_bytes() {
		let signer = PrivateKeySigner::random();
		let digest = B256::repeat_byte(0x77);
		let sig: Signature = signer.sign_hash_sync(&digest).unwrap().into();
		let parsed = Signature::from_bytes(&sig.to_bytes()).unwrap();
		assert_eq!(parsed, sig);
	}
}
