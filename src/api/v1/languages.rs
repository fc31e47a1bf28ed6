//! Language resource: public listing and detail.

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
pub struct Language {
    pub id: String,
    #[sqlx(skip)]
    pub resource_uri: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[tracing::instrument(name = "List languages", skip(inner))]
pub async fn all_languages(
    State(inner): State<InnerState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Language>>, AppError> {
    let InnerState { db } = inner;

    let total_count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM languages"#)
        .fetch_one(&db)
        .await?;

    let mut objects = sqlx::query_as::<_, Language>(
        r#"
        SELECT id, name, created_at
        FROM languages
        ORDER BY name
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(params.limit() as i64)
    .bind(params.offset() as i64)
    .fetch_all(&db)
    .await?;

    for language in &mut objects {
        language.resource_uri = resource_uri("language", &language.id);
    }

    Ok(Json(PaginatedResponse::new(&params, total_count, objects)))
}

#[tracing::instrument(name = "Get language", skip(inner), fields(language_id = %language_id))]
pub async fn get_language(
    State(inner): State<InnerState>,
    Path(language_id): Path<String>,
) -> Result<Json<Language>, AppError> {
    let InnerState { db } = inner;

    let mut language = sqlx::query_as::<_, Language>(
        r#"SELECT id, name, created_at FROM languages WHERE id = $1"#,
    )
    .bind(&language_id)
    .fetch_optional(&db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Language '{}' not found", language_id)))?;

    language.resource_uri = resource_uri("language", &language.id);
    Ok(Json(language))
}
