//! Tag resource: public listing and detail.

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
pub struct Tag {
    pub id: String,
    #[sqlx(skip)]
    pub resource_uri: String,
    pub tag: String,
    pub created_at: NaiveDateTime,
}

#[tracing::instrument(name = "List tags", skip(inner))]
pub async fn all_tags(
    State(inner): State<InnerState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Tag>>, AppError> {
    let InnerState { db } = inner;

    let total_count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM tags"#)
        .fetch_one(&db)
        .await?;

    let mut objects = sqlx::query_as::<_, Tag>(
        r#"
        SELECT id, tag, created_at
        FROM tags
        ORDER BY tag
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(params.limit() as i64)
    .bind(params.offset() as i64)
    .fetch_all(&db)
    .await?;

    for tag in &mut objects {
        tag.resource_uri = resource_uri("tag", &tag.id);
    }

    Ok(Json(PaginatedResponse::new(&params, total_count, objects)))
}

#[tracing::instrument(name = "Get tag", skip(inner), fields(tag_id = %tag_id))]
pub async fn get_tag(
    State(inner): State<InnerState>,
    Path(tag_id): Path<String>,
) -> Result<Json<Tag>, AppError> {
    let InnerState { db } = inner;

    let mut tag = sqlx::query_as::<_, Tag>(
        r#"SELECT id, tag, created_at FROM tags WHERE id = $1"#,
    )
    .bind(&tag_id)
    .fetch_optional(&db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Tag '{}' not found", tag_id)))?;

    tag.resource_uri = resource_uri("tag", &tag.id);
    Ok(Json(tag))
}
