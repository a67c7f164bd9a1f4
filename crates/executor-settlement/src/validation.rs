//! Order pair validation.
//!
//! Checks run in a fixed sequence per the settlement contract: signer
//! authenticity, expiration, complementarity, whitelist membership.
//! Validation reads registry state but mutates nothing; the outcome is a
//! matched-pair confirmation carrying both order digests, or the first
//! failure encountered.

use crate::{OrderSide, SettlementError};
use alloy_primitives::B256;
use executor_registry::AccessControlRegistry;
use executor_types::{DomainSeparator, Order, Signature};

/// Confirmation that a buy/sell pair is settleable, with the EIP-712
/// digests both parties signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPair {
	pub buy_digest: B256,
	pub sell_digest: B256,
}

/// Verifies that `signature` was produced by `order.from` under `domain`
/// and returns the signed digest.
pub fn verify_order_signature(
	order: &Order,
	signature: &Signature,
	domain: &DomainSeparator,
	side: OrderSide,
) -> Result<B256, SettlementError> {
	let digest = order.signing_digest(domain);
	let recovered = signature
		.recover(&digest)
		.map_err(|source| SettlementError::MalformedSignature { side, source })?;
	if recovered != order.from {
		return Err(SettlementError::SignatureMismatch {
			side,
			expected: order.from,
			recovered,
		});
	}
	Ok(digest)
}

/// Fails if the order is past its expiration at `now`.
pub fn check_expiration(order: &Order, now: u64, side: OrderSide) -> Result<(), SettlementError> {
	if order.is_expired(now) {
		return Err(SettlementError::OrderExpired {
			side,
			expiration: order.expiration,
			now,
		});
	}
	Ok(())
}

/// Fails unless the two orders describe the same exchange exactly:
/// mirrored tokens and mirrored amounts, no partial fill, no price
/// improvement.
pub fn check_complementary(buy: &Order, sell: &Order) -> Result<(), SettlementError> {
	let incompatible = |reason: String| SettlementError::OrdersIncompatible { reason };

	if buy.token_out != sell.token_in {
		return Err(incompatible(format!(
			"buy pays {} but sell expects {}",
			buy.token_out, sell.token_in
		)));
	}
	if buy.token_in != sell.token_out {
		return Err(incompatible(format!(
			"buy expects {} but sell pays {}",
			buy.token_in, sell.token_out
		)));
	}
	if buy.amount_out != sell.amount_in {
		return Err(incompatible(format!(
			"buy pays {} but sell expects {}",
			buy.amount_out, sell.amount_in
		)));
	}
	if buy.amount_in != sell.amount_out {
		return Err(incompatible(format!(
			"buy expects {} but sell pays {}",
			buy.amount_in, sell.amount_out
		)));
	}
	Ok(())
}

/// Runs the full validation sequence over a submitted pair.
pub async fn validate_pair(
	domain: &DomainSeparator,
	registry: &AccessControlRegistry,
	buy: &Order,
	buy_signature: &Signature,
	sell: &Order,
	sell_signature: &Signature,
	now: u64,
) -> Result<ValidatedPair, SettlementError> {
	let buy_digest = verify_order_signature(buy, buy_signature, domain, OrderSide::Buy)?;
	let sell_digest = verify_order_signature(sell, sell_signature, domain, OrderSide::Sell)?;

	check_expiration(buy, now, OrderSide::Buy)?;
	check_expiration(sell, now, OrderSide::Sell)?;

	check_complementary(buy, sell)?;

	// Complementarity makes buy.token_in == sell.token_out, so the two
	// out legs cover both traded tokens.
	for token in [&buy.token_out, &sell.token_out] {
		if !registry.is_token_whitelisted(token).await {
			return Err(SettlementError::TokenNotWhitelisted(*token));
		}
	}

	Ok(ValidatedPair {
		buy_digest,
		sell_digest,
	})
}
