//! Configuration module for the order book executor.
//!
//! This module provides structures and utilities for managing executor
//! configuration. It supports loading configuration from TOML files and
//! provides validation to ensure all required configuration values are
//! properly set before any settlement is accepted.

use alloy_primitives::Address;
use executor_types::{parse_token_amount, TokenConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for one executor deployment.
///
/// A deployment is fully described by its signing domain, its access
/// control roster, the tokens it trades, and the optional HTTP API
/// settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// EIP-712 domain parameters for this deployment.
	pub domain: DomainConfig,
	/// Admin account and initial relayer set.
	pub access: AccessConfig,
	/// Tokens eligible for trading, with initial ledger balances.
	pub tokens: Vec<TokenConfig>,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// EIP-712 domain parameters: the chain and address this deployment's
/// signatures are bound to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DomainConfig {
	/// Chain identifier baked into the domain separator.
	pub chain_id: u64,
	/// The executor's own address: verifying contract of the domain and
	/// the spender of every settlement allowance.
	pub executor_address: Address,
}

/// Access control roster established at deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessConfig {
	/// Account allowed to mutate the relayer and whitelist sets.
	pub admin: Address,
	/// Accounts allowed to submit settlements. Must be non-empty.
	pub relayers: Vec<Address>,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

/// Returns the default API host.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	8080
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		let config: Config = toml::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Validates the deployment invariants.
	///
	/// The relayer set must be non-empty, token addresses must be unique,
	/// and every configured balance must parse as a token amount.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.access.relayers.is_empty() {
			return Err(ConfigError::Validation(
				"at least one relayer must be configured".to_string(),
			));
		}

		let mut seen = HashSet::new();
		for token in &self.tokens {
			if !seen.insert(token.address) {
				return Err(ConfigError::Validation(format!(
					"duplicate token address: {}",
					token.address
				)));
			}
			for balance in &token.balances {
				parse_token_amount(&balance.amount).map_err(|e| {
					ConfigError::Validation(format!("token {}: {}", token.symbol, e))
				})?;
			}
		}

		Ok(())
	}

	/// Looks up a configured token by address.
	pub fn token(&self, address: &Address) -> Option<&TokenConfig> {
		self.tokens.iter().find(|t| &t.address == address)
	}
}
