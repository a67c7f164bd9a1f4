//! Main entry point for the order book executor service.
//!
//! This binary hosts one executor deployment: it loads the deployment
//! configuration, seeds the in-memory token ledger, wires up the access
//! control registry and the settlement executor, and serves the relayer
//! HTTP API.

use clap::Parser;
use executor_config::Config;
use executor_ledger::implementations::memory::create_ledger;
use executor_registry::AccessControlRegistry;
use executor_settlement::SettlementExecutor;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

use server::AppState;

/// Command-line arguments for the executor service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "executor.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the executor service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads and validates the deployment configuration
/// 4. Builds the ledger, registry and settlement executor
/// 5. Serves the relayer API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started executor");

	let config = Config::from_file(&args.config)?;
	tracing::info!(
		chain_id = config.domain.chain_id,
		executor = %config.domain.executor_address,
		"Loaded configuration"
	);

	let state = build_state(config.clone()).await?;

	match config.api.clone().filter(|api| api.enabled) {
		Some(api_config) => server::start_server(api_config, state).await?,
		None => tracing::warn!("API server disabled; no settlement surface to serve"),
	}

	tracing::info!("Stopped executor");
	Ok(())
}

/// Builds the application state from a validated configuration.
///
/// The ledger is seeded with every configured token and balance; the
/// registry starts with the configured admin, relayers, and a whitelist
/// covering exactly the configured tokens.
async fn build_state(config: Config) -> Result<AppState, Box<dyn std::error::Error>> {
	let ledger = Arc::new(create_ledger(config.domain.chain_id, &config.tokens).await?);

	let registry = Arc::new(AccessControlRegistry::new(
		config.access.admin,
		config.access.relayers.iter().copied(),
		config.tokens.iter().map(|t| t.address),
	)?);

	let executor = Arc::new(SettlementExecutor::new(
		config.domain.chain_id,
		config.domain.executor_address,
		registry.clone(),
		ledger,
	));

	Ok(AppState {
		executor,
		registry,
		config,
	})
}
