//! The settlement executor.
//!
//! `execute_orders` is the sole privileged entry point: the relayer
//! submits a matched, independently signed buy/sell pair (plus optional
//! permits) and the executor settles both legs atomically against the
//! token ledger, or fails with a typed error and no effects.

use crate::{validation, EventBus, OrderSide, SettlementError};
use alloy_primitives::{Address, B256};
use executor_ledger::{PermitCall, SettlementBatch, TokenLedger, TransferCall};
use executor_registry::AccessControlRegistry;
use executor_types::{
	current_timestamp, truncate_digest, DomainSeparator, Order, SettlementRecord, Signature,
	SignedPermit,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One settlement submission: both signed orders and, optionally, a
/// permit per paying party for allowance acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
	pub buy_order: Order,
	pub buy_signature: Signature,
	pub sell_order: Order,
	pub sell_signature: Signature,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub buyer_permit: Option<SignedPermit>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub seller_permit: Option<SignedPermit>,
}

/// Settles matched order pairs under the restricted-relayer policy.
///
/// Holds no token state of its own: balances, allowances and nonces live
/// in the ledger. The executor's only long-lived state is the set of
/// consumed order digests guarding against double submission.
pub struct SettlementExecutor {
	/// This deployment's address: verifying contract of the signing
	/// domain and spender of every settlement allowance.
	address: Address,
	domain: DomainSeparator,
	registry: Arc<AccessControlRegistry>,
	ledger: Arc<dyn TokenLedger>,
	/// Digests of orders consumed by committed settlements.
	consumed: RwLock<HashSet<B256>>,
	events: EventBus,
}

impl SettlementExecutor {
	/// Creates an executor for the deployment described by `chain_id` and
	/// `address`, settling against `ledger` under `registry`'s policy.
	pub fn new(
		chain_id: u64,
		address: Address,
		registry: Arc<AccessControlRegistry>,
		ledger: Arc<dyn TokenLedger>,
	) -> Self {
		Self {
			address,
			domain: DomainSeparator::new(chain_id, &address),
			registry,
			ledger,
			consumed: RwLock::new(HashSet::new()),
			events: EventBus::default(),
		}
	}

	/// The executor deployment's address.
	pub fn address(&self) -> Address {
		self.address
	}

	/// The domain separator order signatures are verified under.
	pub fn domain(&self) -> &DomainSeparator {
		&self.domain
	}

	/// The bus settlement records are published on.
	pub fn events(&self) -> &EventBus {
		&self.events
	}

	/// Settles a matched order pair.
	///
	/// Steps, each a precondition for the next: relayer check, pair
	/// validation, replay guard, allowance acquisition, atomic ledger
	/// batch, record emission. Any failure aborts the whole call with no
	/// observable effects.
	pub async fn execute_orders(
		&self,
		caller: Address,
		request: SettlementRequest,
	) -> Result<SettlementRecord, SettlementError> {
		if !self.registry.is_relayer(&caller).await {
			return Err(SettlementError::Unauthorized(caller));
		}

		let now = current_timestamp();
		let pair = validation::validate_pair(
			&self.domain,
			&self.registry,
			&request.buy_order,
			&request.buy_signature,
			&request.sell_order,
			&request.sell_signature,
			now,
		)
		.await?;

		// The guard is held across the ledger commit: settlement calls
		// are totally ordered, and a resubmission of either order fails
		// here before it can touch the ledger.
		let mut consumed = self.consumed.write().await;
		if consumed.contains(&pair.buy_digest) {
			return Err(SettlementError::OrderAlreadySettled {
				side: OrderSide::Buy,
			});
		}
		if consumed.contains(&pair.sell_digest) {
			return Err(SettlementError::OrderAlreadySettled {
				side: OrderSide::Sell,
			});
		}

		let mut batch = SettlementBatch::default();
		self.prepare_leg(&mut batch, &request.buy_order, request.buyer_permit.as_ref())
			.await?;
		self.prepare_leg(&mut batch, &request.sell_order, request.seller_permit.as_ref())
			.await?;

		let buy = &request.buy_order;
		let sell = &request.sell_order;
		batch.transfers.push(TransferCall {
			token: buy.token_out,
			from: buy.from,
			to: sell.from,
			amount: buy.amount_out,
			spender: self.address,
		});
		batch.transfers.push(TransferCall {
			token: sell.token_out,
			from: sell.from,
			to: buy.from,
			amount: sell.amount_out,
			spender: self.address,
		});

		self.ledger.apply(batch).await?;

		consumed.insert(pair.buy_digest);
		consumed.insert(pair.sell_digest);
		drop(consumed);

		let record = SettlementRecord {
			buyer: buy.from,
			seller: sell.from,
			buyer_token: buy.token_out,
			buyer_amount: buy.amount_out,
			seller_token: sell.token_out,
			seller_amount: sell.amount_out,
			buy_order_digest: pair.buy_digest,
			sell_order_digest: pair.sell_digest,
			timestamp: now,
		};
		tracing::info!(
			buy_order = %truncate_digest(&format!("{:#x}", pair.buy_digest)),
			sell_order = %truncate_digest(&format!("{:#x}", pair.sell_digest)),
			buyer = %record.buyer,
			seller = %record.seller,
			"Settled order pair"
		);
		self.events.publish(record.clone());
		Ok(record)
	}

	/// Ensures the executor can pull `order.amount_out` of
	/// `order.token_out` from the originator, staging the supplied permit
	/// when the committed allowance falls short.
	async fn prepare_leg(
		&self,
		batch: &mut SettlementBatch,
		order: &Order,
		permit: Option<&SignedPermit>,
	) -> Result<(), SettlementError> {
		let token = order.token_out;
		let owner = order.from;
		let required = order.amount_out;

		let available = self.ledger.allowance(&token, &owner, &self.address).await?;
		if available >= required {
			return Ok(());
		}

		let Some(signed) = permit else {
			return Err(SettlementError::InsufficientAllowance {
				token,
				owner,
				required,
				available,
			});
		};
		if signed.permit.owner != owner || signed.permit.spender != self.address {
			return Err(SettlementError::PermitRejected {
				owner,
				reason: "permit owner/spender does not match the order leg".to_string(),
			});
		}
		if signed.permit.value < required {
			return Err(SettlementError::InsufficientAllowance {
				token,
				owner,
				required,
				available: signed.permit.value,
			});
		}

		batch.permits.push(PermitCall {
			token,
			permit: signed.permit.clone(),
			signature: signed.signature,
		});
		Ok(())
	}
}
