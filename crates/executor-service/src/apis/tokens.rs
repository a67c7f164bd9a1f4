//! Token whitelist listing endpoint.
//!
//! Reports the tokens currently eligible for trading. Metadata comes from
//! the deployment configuration; eligibility is checked against the live
//! registry, so admin removals are reflected immediately.

use crate::server::AppState;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Response body for GET /api/tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListResponse {
	pub chain_id: u64,
	pub tokens: Vec<TokenEntry>,
}

/// One whitelisted token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
	pub address: Address,
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
}

/// Lists the currently whitelisted tokens.
pub async fn list_tokens(state: &AppState) -> TokenListResponse {
	let mut tokens = Vec::new();
	for token in &state.config.tokens {
		if state.registry.is_token_whitelisted(&token.address).await {
			tokens.push(TokenEntry {
				address: token.address,
				name: token.name.clone(),
				symbol: token.symbol.clone(),
				decimals: token.decimals,
			});
		}
	}
	TokenListResponse {
		chain_id: state.config.domain.chain_id,
		tokens,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use executor_config::{AccessConfig, Config, DomainConfig};
	use executor_ledger::implementations::memory::create_ledger;
	use executor_registry::AccessControlRegistry;
	use executor_settlement::SettlementExecutor;
	use executor_types::TokenConfig;
	use std::sync::Arc;

	async fn state() -> AppState {
		let admin = Address::repeat_byte(0x0a);
		let config = Config {
			domain: DomainConfig {
				chain_id: 31337,
				executor_address: Address::repeat_byte(0x42),
			},
			access: AccessConfig {
				admin,
				relayers: vec![Address::repeat_byte(0x01)],
			},
			tokens: vec![
				TokenConfig {
					address: Address::repeat_byte(0xaa),
					name: "Token A".to_string(),
					symbol: "TKA".to_string(),
					decimals: 18,
					balances: vec![],
				},
				TokenConfig {
					address: Address::repeat_byte(0xbb),
					name: "Token B".to_string(),
					symbol: "TKB".to_string(),
					decimals: 6,
					balances: vec![],
				},
			],
			api: None,
		};
		config.validate().unwrap();

		let ledger = Arc::new(create_ledger(31337, &config.tokens).await.unwrap());
		let registry = Arc::new(
			AccessControlRegistry::new(
				admin,
				config.access.relayers.iter().copied(),
				config.tokens.iter().map(|t| t.address),
			)
			.unwrap(),
		);
		let executor = Arc::new(SettlementExecutor::new(
			31337,
			config.domain.executor_address,
			registry.clone(),
			ledger,
		));
		AppState {
			executor,
			registry,
			config,
		}
	}

	#[tokio::test]
	async fn test_listing_reflects_live_whitelist() {
		let state = state().await;
		assert_eq!(list_tokens(&state).await.tokens.len(), 2);

		let admin = state.config.access.admin;
		state
			.registry
			.remove_token(&admin, &Address::repeat_byte(0xbb))
			.await
			.unwrap();

		let listing = list_tokens(&state).await;
		assert_eq!(listing.chain_id, 31337);
		assert_eq!(listing.tokens.len(), 1);
		assert_eq!(listing.tokens[0].symbol, "TKA");
	}
}
