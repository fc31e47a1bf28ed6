//! API-key authentication.
//!
//! Credentials ride in the `Authorization` header as
//! `ApiKey <username>:<key>` and are checked against the `users` and
//! `api_keys` tables. Requests without the header are anonymous.

use axum::http::{header, HeaderMap};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::errors::AppError;

const API_KEY_LEN: usize = 40;

/// A caller that presented valid API-key credentials.
#[derive(Debug, Clone, FromRow)]
pub struct ApiUser {
    pub id: String,
    pub username: String,
    pub is_superuser: bool,
}

/// Splits `ApiKey <username>:<key>` into its parts.
pub fn parse_api_key_header(value: &str) -> Option<(&str, &str)> {
    let credentials = value.strip_prefix("ApiKey ")?;
    let (username, key) = credentials.split_once(':')?;
    if username.is_empty() || key.is_empty() {
        return None;
    }
    Some((username, key))
}

/// Resolves the caller from the request headers.
///
/// No `Authorization` header means anonymous access and resolves to
/// `Ok(None)`. A header that is malformed, names an unknown user, or
/// carries the wrong key is an authentication failure.
pub async fn authenticate(
    db: &SqlitePool,
    headers: &HeaderMap,
) -> Result<Option<ApiUser>, AppError> {
    let header_value = match headers.get(header::AUTHORIZATION) {
        Some(value) => value,
        None => return Ok(None),
    };

    let raw = header_value.to_str().map_err(|_| {
        AppError::Authentication(anyhow::anyhow!("Invalid authorization header"))
    })?;

    let (username, key) = parse_api_key_header(raw).ok_or_else(|| {
        AppError::Authentication(anyhow::anyhow!("Invalid authorization header"))
    })?;

    let user = sqlx::query_as::<_, ApiUser>(
        r#"
        SELECT u.id, u.username, u.is_superuser
        FROM users u
        INNER JOIN api_keys k ON k.user_id = u.id
        WHERE u.username = $1 AND k.key = $2
        "#,
    )
    .bind(username)
    .bind(key)
    .fetch_optional(db)
    .await?;

    match user {
        Some(user) => {
            tracing::debug!("authenticated api user {}", user.username);
            Ok(Some(user))
        }
        None => Err(AppError::Authentication(anyhow::anyhow!(
            "Invalid API key credentials"
        ))),
    }
}

/// Generates and stores a fresh API key for the given user, replacing
/// any previous key.
pub async fn issue_api_key(db: &SqlitePool, user_id: &str) -> Result<String, AppError> {
    let key: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(API_KEY_LEN)
        .map(char::from)
        .collect();

    sqlx::query(
        r#"
        INSERT INTO api_keys (id, user_id, key)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE SET key = excluded.key
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&key)
    .execute(db)
    .await?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_header() {
        let parsed = parse_api_key_header("ApiKey api_user:c4f2");
        assert_eq!(parsed, Some(("api_user", "c4f2")));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(parse_api_key_header("Bearer abc"), None);
        assert_eq!(parse_api_key_header("apikey user:key"), None);
    }

    #[test]
    fn rejects_missing_parts() {
        assert_eq!(parse_api_key_header("ApiKey useronly"), None);
        assert_eq!(parse_api_key_header("ApiKey :key"), None);
        assert_eq!(parse_api_key_header("ApiKey user:"), None);
    }

    #[test]
    fn key_material_is_the_expected_length() {
        let key: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(API_KEY_LEN)
            .map(char::from)
            .collect();
        assert_eq!(key.len(), API_KEY_LEN);
    }
}
