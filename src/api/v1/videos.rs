//! Video resource: listing, detail, and authenticated creation.
//!
//! Listings and detail lookups are visibility-filtered: anonymous (and
//! non-superuser) callers only ever see videos in the `live` state.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::api::common::refs::{parse_resource_ref, resource_uri};
use crate::api::common::{PaginatedResponse, PaginationParams};
use crate::auth::authenticate;
use crate::errors::AppError;
use crate::InnerState;

/// Publication state of a video. Only `live` videos are visible to
/// anonymous callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum VideoState {
    Live,
    Draft,
}

#[derive(Debug, FromRow)]
struct VideoQueryRow {
    id: String,
    title: String,
    summary: Option<String>,
    description: Option<String>,
    source_url: Option<String>,
    state: VideoState,
    category: String,
    language: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct VideoDetail {
    pub id: String,
    pub resource_uri: String,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub source_url: Option<String>,
    pub state: VideoState,
    pub category: String,
    pub speakers: Vec<String>,
    pub tags: Vec<String>,
    pub language: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl VideoQueryRow {
    fn into_detail(self, speakers: Vec<String>, tags: Vec<String>) -> VideoDetail {
        VideoDetail {
            resource_uri: resource_uri("video", &self.id),
            id: self.id,
            title: self.title,
            summary: self.summary,
            description: self.description,
            source_url: self.source_url,
            state: self.state,
            category: self.category,
            speakers,
            tags,
            language: self.language,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub source_url: Option<String>,
    pub state: Option<VideoState>,
    pub category: Option<String>,
    pub speakers: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub language: Option<String>,
}

const VIDEO_SELECT: &str = r#"
    SELECT v.id, v.title, v.summary, v.description, v.source_url, v.state,
           c.name AS category, l.name AS language,
           v.created_at, v.updated_at
    FROM videos v
    INNER JOIN categories c ON c.id = v.category_id
    LEFT JOIN languages l ON l.id = v.language_id
"#;

#[tracing::instrument(name = "List videos", skip(inner, headers))]
pub async fn all_videos(
    State(inner): State<InnerState>,
    Query(params): Query<PaginationParams>,
    headers: HeaderMap,
) -> Result<Json<PaginatedResponse<VideoDetail>>, AppError> {
    let InnerState { db } = inner;

    let viewer = authenticate(&db, &headers).await?;
    let see_all = viewer.map(|u| u.is_superuser).unwrap_or(false);

    let total_count: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM videos v WHERE (v.state = 'live' OR $1)"#,
    )
    .bind(see_all)
    .fetch_one(&db)
    .await?;

    let query = format!(
        "{} WHERE (v.state = 'live' OR $1) ORDER BY v.created_at, v.id LIMIT $2 OFFSET $3",
        VIDEO_SELECT
    );

    let rows = sqlx::query_as::<_, VideoQueryRow>(&query)
        .bind(see_all)
        .bind(params.limit() as i64)
        .bind(params.offset() as i64)
        .fetch_all(&db)
        .await?;

    let mut objects = Vec::with_capacity(rows.len());
    for row in rows {
        let speakers = fetch_speaker_names(&db, &row.id).await?;
        let tags = fetch_tag_values(&db, &row.id).await?;
        objects.push(row.into_detail(speakers, tags));
    }

    tracing::debug!("listing {} of {} videos", objects.len(), total_count);
    Ok(Json(PaginatedResponse::new(&params, total_count, objects)))
}

#[tracing::instrument(name = "Get video", skip(inner, headers), fields(video_id = %video_id))]
pub async fn get_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<VideoDetail>, AppError> {
    let InnerState { db } = inner;

    let viewer = authenticate(&db, &headers).await?;
    let see_all = viewer.map(|u| u.is_superuser).unwrap_or(false);

    let detail = fetch_video_detail(&db, &video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video '{}' not found", video_id)))?;

    // Draft videos are indistinguishable from missing ones for callers
    // without the privilege to see them.
    if detail.state == VideoState::Draft && !see_all {
        return Err(AppError::NotFound(format!("Video '{}' not found", video_id)));
    }

    Ok(Json(detail))
}

#[tracing::instrument(name = "Create video", skip(inner, headers, payload))]
pub async fn create_video(
    State(inner): State<InnerState>,
    headers: HeaderMap,
    Json(payload): Json<CreateVideoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let InnerState { db } = inner;

    let user = authenticate(&db, &headers)
        .await?
        .ok_or_else(|| AppError::Authentication(anyhow::anyhow!("API key required")))?;

    // A payload without a title is treated as empty and rejected with
    // 404, matching the long-observed behavior of this API.
    let title = match payload.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => {
            return Err(AppError::NotFound(
                "Cannot create a video from an empty payload".to_string(),
            ))
        }
    };

    let category_value = payload
        .category
        .as_deref()
        .ok_or_else(|| AppError::Validation("A category is required".to_string()))?;
    let category_id = resolve_category_id(&db, category_value).await?;

    let state = payload.state.unwrap_or(VideoState::Draft);
    let video_id = Uuid::new_v4().to_string();

    let mut tx = db.begin().await?;

    let language_id = match payload.language.as_deref() {
        Some(value) => Some(resolve_language_id(&mut *tx, value).await?),
        None => None,
    };

    sqlx::query(
        r#"
        INSERT INTO videos (id, title, summary, description, source_url, state, category_id, language_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(&video_id)
    .bind(&title)
    .bind(&payload.summary)
    .bind(&payload.description)
    .bind(&payload.source_url)
    .bind(state)
    .bind(&category_id)
    .bind(&language_id)
    .execute(&mut *tx)
    .await?;

    for value in payload.speakers.as_deref().unwrap_or_default() {
        let speaker_id = resolve_speaker_id(&mut *tx, value).await?;
        sqlx::query(
            r#"INSERT OR IGNORE INTO video_speakers (video_id, speaker_id) VALUES ($1, $2)"#,
        )
        .bind(&video_id)
        .bind(&speaker_id)
        .execute(&mut *tx)
        .await?;
    }

    for value in payload.tags.as_deref().unwrap_or_default() {
        let tag_id = resolve_tag_id(&mut *tx, value).await?;
        sqlx::query(r#"INSERT OR IGNORE INTO video_tags (video_id, tag_id) VALUES ($1, $2)"#)
            .bind(&video_id)
            .bind(&tag_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!("user {} created video {}", user.username, video_id);

    let detail = fetch_video_detail(&db, &video_id).await?.ok_or_else(|| {
        AppError::Unexpected(anyhow::anyhow!("Created video {} disappeared", video_id))
    })?;

    let location = resource_uri("video", &video_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(detail),
    ))
}

pub(crate) async fn fetch_video_detail(
    db: &SqlitePool,
    video_id: &str,
) -> Result<Option<VideoDetail>, AppError> {
    let query = format!("{} WHERE v.id = $1", VIDEO_SELECT);

    let row = sqlx::query_as::<_, VideoQueryRow>(&query)
        .bind(video_id)
        .fetch_optional(db)
        .await?;

    let row = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let speakers = fetch_speaker_names(db, video_id).await?;
    let tags = fetch_tag_values(db, video_id).await?;
    Ok(Some(row.into_detail(speakers, tags)))
}

async fn fetch_speaker_names(db: &SqlitePool, video_id: &str) -> Result<Vec<String>, AppError> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT s.name
        FROM speakers s
        INNER JOIN video_speakers vs ON vs.speaker_id = s.id
        WHERE vs.video_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(video_id)
    .fetch_all(db)
    .await?;
    Ok(names)
}

async fn fetch_tag_values(db: &SqlitePool, video_id: &str) -> Result<Vec<String>, AppError> {
    let values = sqlx::query_scalar::<_, String>(
        r#"
        SELECT t.tag
        FROM tags t
        INNER JOIN video_tags vt ON vt.tag_id = t.id
        WHERE vt.video_id = $1
        ORDER BY t.tag
        "#,
    )
    .bind(video_id)
    .fetch_all(db)
    .await?;
    Ok(values)
}

/// Categories are never auto-created: the reference (URL or name) must
/// point at an existing row.
async fn resolve_category_id(db: &SqlitePool, value: &str) -> Result<String, AppError> {
    let found: Option<String> = match parse_resource_ref(value, "category") {
        Some(id) => {
            sqlx::query_scalar(r#"SELECT id FROM categories WHERE id = $1"#)
                .bind(id)
                .fetch_optional(db)
                .await?
        }
        None => {
            sqlx::query_scalar(r#"SELECT id FROM categories WHERE name = $1"#)
                .bind(value)
                .fetch_optional(db)
                .await?
        }
    };

    found.ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", value)))
}

async fn resolve_speaker_id(
    tx: &mut SqliteConnection,
    value: &str,
) -> Result<String, AppError> {
    if let Some(id) = parse_resource_ref(value, "speaker") {
        let found: Option<String> = sqlx::query_scalar(r#"SELECT id FROM speakers WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        return found.ok_or_else(|| AppError::NotFound(format!("Speaker '{}' not found", value)));
    }

    let existing: Option<String> = sqlx::query_scalar(r#"SELECT id FROM speakers WHERE name = $1"#)
        .bind(value)
        .fetch_optional(&mut *tx)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(r#"INSERT INTO speakers (id, name) VALUES ($1, $2)"#)
        .bind(&id)
        .bind(value)
        .execute(&mut *tx)
        .await?;
    Ok(id)
}

async fn resolve_tag_id(tx: &mut SqliteConnection, value: &str) -> Result<String, AppError> {
    if let Some(id) = parse_resource_ref(value, "tag") {
        let found: Option<String> = sqlx::query_scalar(r#"SELECT id FROM tags WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        return found.ok_or_else(|| AppError::NotFound(format!("Tag '{}' not found", value)));
    }

    let existing: Option<String> = sqlx::query_scalar(r#"SELECT id FROM tags WHERE tag = $1"#)
        .bind(value)
        .fetch_optional(&mut *tx)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(r#"INSERT INTO tags (id, tag) VALUES ($1, $2)"#)
        .bind(&id)
        .bind(value)
        .execute(&mut *tx)
        .await?;
    Ok(id)
}

async fn resolve_language_id(
    tx: &mut SqliteConnection,
    value: &str,
) -> Result<String, AppError> {
    if let Some(id) = parse_resource_ref(value, "language") {
        let found: Option<String> = sqlx::query_scalar(r#"SELECT id FROM languages WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        return found.ok_or_else(|| AppError::NotFound(format!("Language '{}' not found", value)));
    }

    let existing: Option<String> =
        sqlx::query_scalar(r#"SELECT id FROM languages WHERE name = $1"#)
            .bind(value)
            .fetch_optional(&mut *tx)
            .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(r#"INSERT INTO languages (id, name) VALUES ($1, $2)"#)
        .bind(&id)
        .bind(value)
        .execute(&mut *tx)
        .await?;
    Ok(id)
}
