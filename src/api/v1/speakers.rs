//! Speaker resource: public listing and detail.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::api::common::refs::resource_uri;
use crate::api::common::{PaginatedResponse, PaginationParams};
use crate::errors::AppError;
use crate::InnerState;

#[derive(Debug, Serialize, FromRow)]
pub struct Speaker {
    pub id: String,
    #[sqlx(skip)]
    pub resource_uri: String,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[tracing::instrument(name = "List speakers", skip(inner))]
pub async fn all_speakers(
    State(inner): State<InnerState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Speaker>>, AppError> {
    let InnerState { db } = inner;

    let total_count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM speakers"#)
        .fetch_one(&db)
        .await?;

    let mut objects = sqlx::query_as::<_, Speaker>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM speakers
        ORDER BY name
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(params.limit() as i64)
    .bind(params.offset() as i64)
    .fetch_all(&db)
    .await?;

    for speaker in &mut objects {
        speaker.resource_uri = resource_uri("speaker", &speaker.id);
    }

    Ok(Json(PaginatedResponse::new(&params, total_count, objects)))
}

#[tracing::instrument(name = "Get speaker", skip(inner), fields(speaker_id = %speaker_id))]
pub async fn get_speaker(
    State(inner): State<InnerState>,
    Path(speaker_id): Path<String>,
) -> Result<Json<Speaker>, AppError> {
    let InnerState { db } = inner;

    let mut speaker = sqlx::query_as::<_, Speaker>(
        r#"SELECT id, name, created_at, updated_at FROM speakers WHERE id = $1"#,
    )
    .bind(&speaker_id)
    .fetch_optional(&db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Speaker '{}' not found", speaker_id)))?;

    speaker.resource_uri = resource_uri("speaker", &speaker.id);
    Ok(Json(speaker))
}
