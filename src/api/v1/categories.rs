//! Category resource: public listing and detail.

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
pub struct Category {
    pub id: String,
    #[sqlx(skip)]
    pub resource_uri: String,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[tracing::instrument(name = "List categories", skip(inner))]
pub async fn all_categories(
    State(inner): State<InnerState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Category>>, AppError> {
    let InnerState { db } = inner;

    let total_count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM categories"#)
        .fetch_one(&db)
        .await?;

    let mut objects = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM categories
        ORDER BY name
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(params.limit() as i64)
    .bind(params.offset() as i64)
    .fetch_all(&db)
    .await?;

    for category in &mut objects {
        category.resource_uri = resource_uri("category", &category.id);
    }

    Ok(Json(PaginatedResponse::new(&params, total_count, objects)))
}

#[tracing::instrument(name = "Get category", skip(inner), fields(category_id = %category_id))]
pub async fn get_category(
    State(inner): State<InnerState>,
    Path(category_id): Path<String>,
) -> Result<Json<Category>, AppError> {
    let InnerState { db } = inner;

    let mut category = sqlx::query_as::<_, Category>(
        r#"SELECT id, name, created_at, updated_at FROM categories WHERE id = $1"#,
    )
    .bind(&category_id)
    .fetch_optional(&db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", category_id)))?;

    category.resource_uri = resource_uri("category", &category.id);
    Ok(Json(category))
}
