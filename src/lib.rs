pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod system;

use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;

use crate::system::health_check;

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct InnerState {
    pub db: SqlitePool,
}

impl InnerState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Builds the application router.
///
/// The versioned API surface is only mounted when `api_enabled` is true;
/// with the flag off every `/api/v1/...` path falls through to the
/// framework 404. `/health` stays mounted either way.
pub fn build_router(state: InnerState, api_enabled: bool) -> Router {
    Router::new()
        .merge(api::create_api_router(state.clone(), api_enabled))
        .route("/health", get(health_check))
        .with_state(state)
}
