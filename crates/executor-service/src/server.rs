//! HTTP server for the executor API.
//!
//! This module provides a minimal HTTP server infrastructure for the
//! relayer-facing settlement surface.

use axum::{
	extract::State,
	response::Json,
	routing::{get, post},
	Router,
};
use executor_config::{ApiConfig, Config};
use executor_registry::AccessControlRegistry;
use executor_settlement::SettlementExecutor;
use executor_types::{ApiError, SettlementRecord};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::apis;
use crate::apis::settlements::SubmitSettlementRequest;
use crate::apis::tokens::TokenListResponse;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// The settlement executor for this deployment.
	pub executor: Arc<SettlementExecutor>,
	/// Access control registry backing the executor.
	pub registry: Arc<AccessControlRegistry>,
	/// Complete deployment configuration.
	pub config: Config,
}

/// Starts the HTTP server for the API.
///
/// This function creates and configures the HTTP server with routing,
/// middleware, and error handling for the settlement and token endpoints.
pub async fn start_server(
	api_config: ApiConfig,
	state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/settlements", post(handle_settlement))
				.route("/tokens", get(handle_tokens)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Executor API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles POST /api/settlements requests.
///
/// This endpoint accepts a matched order pair from a relayer and settles
/// it atomically, returning the emitted settlement record.
async fn handle_settlement(
	State(state): State<AppState>,
	Json(request): Json<SubmitSettlementRequest>,
) -> Result<Json<SettlementRecord>, ApiError> {
	match apis::settlements::submit_settlement(&state, request).await {
		Ok(record) => Ok(Json(record)),
		Err(e) => {
			tracing::warn!("Settlement submission failed: {}", e);
			Err(e)
		}
	}
}

/// Handles GET /api/tokens requests.
///
/// This endpoint lists the tokens currently whitelisted for trading.
async fn handle_tokens(State(state): State<AppState>) -> Json<TokenListResponse> {
	Json(apis::tokens::list_tokens(&state).await)
}
