//! Settlement submission endpoint.
//!
//! Maps the settlement error taxonomy onto the HTTP error envelope. The
//! caller account travels in the request body; the executor enforces the
//! relayer privilege against it.

use crate::server::AppState;
use alloy_primitives::Address;
use executor_settlement::{SettlementError, SettlementRequest};
use executor_types::{ApiError, SettlementRecord};
use serde::{Deserialize, Serialize};

/// Body of POST /api/settlements: the submitting relayer account plus the
/// matched pair and optional permits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSettlementRequest {
	/// Account submitting the settlement; must hold the relayer privilege.
	pub caller: Address,
	#[serde(flatten)]
	pub request: SettlementRequest,
}

/// Executes a submitted settlement and maps failures to API errors.
pub async fn submit_settlement(
	state: &AppState,
	submission: SubmitSettlementRequest,
) -> Result<SettlementRecord, ApiError> {
	state
		.executor
		.execute_orders(submission.caller, submission.request)
		.await
		.map_err(settlement_error_to_api)
}

/// Stable error code for each settlement failure kind.
fn error_code(err: &SettlementError) -> &'static str {
	match err {
		SettlementError::Unauthorized(_) => "UNAUTHORIZED",
		SettlementError::MalformedSignature { .. } => "MALFORMED_SIGNATURE",
		SettlementError::SignatureMismatch { .. } => "SIGNATURE_MISMATCH",
		SettlementError::OrderExpired { .. } => "ORDER_EXPIRED",
		SettlementError::OrdersIncompatible { .. } => "ORDERS_INCOMPATIBLE",
		SettlementError::TokenNotWhitelisted(_) => "TOKEN_NOT_WHITELISTED",
		SettlementError::OrderAlreadySettled { .. } => "ORDER_ALREADY_SETTLED",
		SettlementError::PermitRejected { .. } => "PERMIT_REJECTED",
		SettlementError::InsufficientAllowance { .. } => "INSUFFICIENT_ALLOWANCE",
		SettlementError::TransferFailed { .. } => "TRANSFER_FAILED",
	}
}

/// Maps a settlement failure onto the HTTP error envelope.
fn settlement_error_to_api(err: SettlementError) -> ApiError {
	let error_type = error_code(&err).to_string();
	let message = err.to_string();
	match err {
		SettlementError::Unauthorized(_) => ApiError::Forbidden {
			error_type,
			message,
		},
		SettlementError::MalformedSignature { .. } => ApiError::BadRequest {
			error_type,
			message,
		},
		SettlementError::OrderAlreadySettled { .. } => ApiError::Conflict {
			error_type,
			message,
		},
		_ => ApiError::UnprocessableEntity {
			error_type,
			message,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use executor_settlement::OrderSide;
	use executor_types::SignatureError;

	#[test]
	fn test_status_mapping() {
		let unauthorized = settlement_error_to_api(SettlementError::Unauthorized(Address::ZERO));
		assert_eq!(unauthorized.status_code(), 403);
		assert_eq!(unauthorized.to_error_response().error, "UNAUTHORIZED");

		let malformed = settlement_error_to_api(SettlementError::MalformedSignature {
			side: OrderSide::Buy,
			source: SignatureError::InvalidLength(64),
		});
		assert_eq!(malformed.status_code(), 400);

		let replayed = settlement_error_to_api(SettlementError::OrderAlreadySettled {
			side: OrderSide::Sell,
		});
		assert_eq!(replayed.status_code(), 409);

		let expired = settlement_error_to_api(SettlementError::OrderExpired {
			side: OrderSide::Buy,
			expiration: 1,
			now: 2,
		});
		assert_eq!(expired.status_code(), 422);
	}

	#[test]
	fn test_submission_wire_format() {
		let json = serde_json::json!({
			"caller": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
			"buyOrder": {
				"from": "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
				"tokenOut": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
				"amountOut": "0x32",
				"tokenIn": "0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9",
				"amountIn": "0x64",
				"expiration": 1700000000u64,
			},
			"buySignature": {
				"r": "0x1111111111111111111111111111111111111111111111111111111111111111",
				"s": "0x2222222222222222222222222222222222222222222222222222222222222222",
				"v": 27,
			},
			"sellOrder": {
				"from": "0x90F79bf6EB2c4f870365E785982E1f101E93b906",
				"tokenOut": "0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9",
				"amountOut": "0x64",
				"tokenIn": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
				"amountIn": "0x32",
				"expiration": 1700000000u64,
			},
			"sellSignature": {
				"r": "0x3333333333333333333333333333333333333333333333333333333333333333",
				"s": "0x4444444444444444444444444444444444444444444444444444444444444444",
				"v": 28,
			},
		});

		let submission: SubmitSettlementRequest =
			serde_json::from_value(json).expect("submission should deserialize");
		assert!(submission.request.buyer_permit.is_none());
		assert_eq!(submission.request.buy_signature.v, 27);
		assert_eq!(
			submission.request.buy_order.token_out,
			submission.request.sell_order.token_in
		);
	}
}
