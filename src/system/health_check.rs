use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::InnerState;

/// Liveness probe. Reports the crate version and whether the database
/// answers a trivial query. Mounted even when the API flag is off.
pub async fn health_check(State(inner): State<InnerState>) -> impl IntoResponse {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&inner.db).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("health check database ping failed: {:?}", e);
            "unavailable"
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "database": database,
        })),
    )
}
