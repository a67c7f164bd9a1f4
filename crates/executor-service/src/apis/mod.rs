//! API endpoint modules for the executor service.

/// Settlement submission endpoint.
pub mod settlements;
/// Token whitelist listing endpoint.
pub mod tokens;
