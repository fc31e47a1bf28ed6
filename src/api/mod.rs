//! API module containing all versioned API endpoints.

pub mod common;
pub mod v1;

use axum::Router;

use crate::InnerState;

/// Creates the main API router.
///
/// When the API is disabled by configuration no routes are mounted at
/// all, so every `/api/...` path answers 404.
pub fn create_api_router(state: InnerState, api_enabled: bool) -> Router<InnerState> {
    if !api_enabled {
        tracing::warn!("API is disabled by configuration, not mounting /api/v1");
        return Router::new();
    }

    Router::new().nest("/api/v1", v1::routes::create_v1_routes(state))
}
