//! Access control registry for the order book executor.
//!
//! This module tracks which accounts hold the relayer privilege and which
//! token contracts are whitelisted for trading. Mutations are restricted
//! to the admin role established at deployment and take effect
//! immediately for subsequent settlement calls.

use alloy_primitives::Address;
use std::collections::HashSet;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// The caller does not hold the admin role.
	#[error("caller {0} is not the admin")]
	NotAdmin(Address),
	/// Deployment would leave the relayer set empty.
	#[error("relayer set must not be empty")]
	EmptyRelayerSet,
}

/// Registry of privileged relayer accounts and whitelisted tokens.
///
/// The admin account is fixed at construction; the relayer set must be
/// non-empty after initialization. Membership checks are the capability
/// gate for the settlement entry point.
pub struct AccessControlRegistry {
	admin: Address,
	relayers: RwLock<HashSet<Address>>,
	tokens: RwLock<HashSet<Address>>,
}

impl AccessControlRegistry {
	/// Creates a registry with the given admin, relayers and whitelisted
	/// tokens. Fails if no relayer is supplied.
	pub fn new(
		admin: Address,
		relayers: impl IntoIterator<Item = Address>,
		tokens: impl IntoIterator<Item = Address>,
	) -> Result<Self, RegistryError> {
		let relayers: HashSet<Address> = relayers.into_iter().collect();
		if relayers.is_empty() {
			return Err(RegistryError::EmptyRelayerSet);
		}
		Ok(Self {
			admin,
			relayers: RwLock::new(relayers),
			tokens: RwLock::new(tokens.into_iter().collect()),
		})
	}

	/// The admin account fixed at deployment.
	pub fn admin(&self) -> Address {
		self.admin
	}

	/// Whether `account` holds the relayer privilege.
	pub async fn is_relayer(&self, account: &Address) -> bool {
		self.relayers.read().await.contains(account)
	}

	/// Whether `token` is eligible for trading.
	pub async fn is_token_whitelisted(&self, token: &Address) -> bool {
		self.tokens.read().await.contains(token)
	}

	/// Grants the relayer privilege to `account`. Admin only.
	pub async fn add_relayer(
		&self,
		caller: &Address,
		account: Address,
	) -> Result<(), RegistryError> {
		self.require_admin(caller)?;
		self.relayers.write().await.insert(account);
		tracing::info!(relayer = %account, "Added relayer");
		Ok(())
	}

	/// Revokes the relayer privilege from `account`. Admin only.
	pub async fn remove_relayer(
		&self,
		caller: &Address,
		account: &Address,
	) -> Result<(), RegistryError> {
		self.require_admin(caller)?;
		self.relayers.write().await.remove(account);
		tracing::info!(relayer = %account, "Removed relayer");
		Ok(())
	}

	/// Adds `token` to the trading whitelist. Admin only.
	pub async fn add_token(&self, caller: &Address, token: Address) -> Result<(), RegistryError> {
		self.require_admin(caller)?;
		self.tokens.write().await.insert(token);
		tracing::info!(token = %token, "Whitelisted token");
		Ok(())
	}

	/// Removes `token` from the trading whitelist. Admin only.
	pub async fn remove_token(
		&self,
		caller: &Address,
		token: &Address,
	) -> Result<(), RegistryError> {
		self.require_admin(caller)?;
		self.tokens.write().await.remove(token);
		tracing::info!(token = %token, "Removed token from whitelist");
		Ok(())
	}

	/// Snapshot of the current relayer set.
	pub async fn relayers(&self) -> Vec<Address> {
		self.relayers.read().await.iter().copied().collect()
	}

	/// Snapshot of the current whitelist.
	pub async fn whitelisted_tokens(&self) -> Vec<Address> {
		self.tokens.read().await.iter().copied().collect()
	}

	fn require_admin(&self, caller: &Address) -> Result<(), RegistryError> {
		if caller != &self.admin {
			return Err(RegistryError::NotAdmin(*caller));
		}
		Ok(())
	}
}
