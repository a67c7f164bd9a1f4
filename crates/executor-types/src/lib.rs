//! Common types module for the order book executor.
//!
//! This module defines the core data types and structures shared by the
//! executor components. It provides a centralized location for the order
//! and permit payloads, their EIP-712 hashing, signature recovery, and
//! the settlement record emitted after a successful exchange.

/// API error envelope for HTTP endpoints.
pub mod api;
/// EIP-712 domain separation and struct hashing.
pub mod eip712;
/// Settlement record types emitted after successful settlements.
pub mod events;
/// The signed order payload and its typed-data schema.
pub mod order;
/// Permit-style allowance authorizations and their typed-data schema.
pub mod permit;
/// Detached ECDSA signatures and signer recovery.
pub mod signature;
/// Token configuration types.
pub mod tokens;
/// Small shared helpers.
pub mod utils;

// Re-export all types for convenient access
pub use api::*;
pub use eip712::*;
pub use events::*;
pub use order::*;
pub use permit::*;
pub use signature::*;
pub use tokens::{parse_token_amount, TokenBalance, TokenConfig};
pub use utils::{current_timestamp, truncate_digest};

// The primitive types every component speaks in.
pub use alloy_primitives::{Address, B256, U256};
