//! 세션 저장소
//!
//! Sessions are rows keyed by an opaque random token that travels in the
//! `sid` cookie. A session only records the external identity; whether that
//! identity has registered a username is looked up per request.
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::query::queries;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
// endregion: --- Imports

pub mod extract;

pub const SESSION_COOKIE: &str = "sid";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

const TOKEN_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Session {
    pub token: String,
    pub identity_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// URL-safe random token for sessions and OAuth `state` values.
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_LEN] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// 세션 생성
pub async fn create_session(
    db_manager: &DatabaseManager,
    identity_hash: &str,
    ttl: Duration,
) -> Result<Session, sqlx::Error> {
    let now = Utc::now();
    let session = Session {
        token: generate_token(),
        identity_hash: identity_hash.to_string(),
        created_at: now,
        expires_at: now + ttl,
    };

    sqlx::query(queries::INSERT_SESSION)
        .bind(&session.token)
        .bind(&session.identity_hash)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(db_manager.pool())
        .await?;

    info!("{:<12} --> 세션 생성, 만료: {}", "Session", session.expires_at);
    Ok(session)
}

/// 유효한 세션 조회
pub async fn find_session(
    db_manager: &DatabaseManager,
    token: &str,
) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(queries::GET_LIVE_SESSION)
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(db_manager.pool())
        .await
}

/// 세션 삭제
pub async fn destroy_session(db_manager: &DatabaseManager, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query(queries::DELETE_SESSION)
        .bind(token)
        .execute(db_manager.pool())
        .await?;
    debug!("{:<12} --> 세션 삭제", "Session");
    Ok(())
}

/// 만료된 세션 정리. 삭제된 행 수를 돌려준다.
pub async fn purge_expired_sessions(
    db_manager: &DatabaseManager,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(queries::DELETE_EXPIRED_SESSIONS)
        .bind(now)
        .execute(db_manager.pool())
        .await?;
    Ok(result.rows_affected())
}
