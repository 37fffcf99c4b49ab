//! 게시물 관련 커맨드 처리
//! 1. 게시물 작성
//! 2. 좋아요 토글
//! 3. 게시물 삭제
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::query::queries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use thiserror::Error;
use tracing::{info, warn};
// endregion: --- Imports

#[derive(Debug, Error)]
pub enum PostError {
    #[error("Title and content are required")]
    MissingField,
    #[error("Post {0} not found")]
    PostNotFound(i64),
    #[error("Post {0} not found or you are not the owner")]
    NotOwner(i64),
    #[error("Post {0} has a concluded auction and cannot be deleted")]
    AuctionClosed(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

// region:    --- Commands
/// 게시물 작성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub username: String,
    pub image_url: Option<String>,
}

/// 좋아요 토글 결과
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub likes: i64,
    pub liked: bool,
}

/// 1. 게시물 작성
pub async fn handle_create_post(
    db_manager: &DatabaseManager,
    cmd: CreatePostCommand,
) -> Result<i64, PostError> {
    info!("{:<12} --> 게시물 작성: {:?}", "Command", cmd);

    let title = cmd.title.trim();
    let content = cmd.content.trim();
    if title.is_empty() || content.is_empty() {
        return Err(PostError::MissingField);
    }
    let image_url = cmd
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());

    let post_id = sqlx::query_scalar::<_, i64>(queries::INSERT_POST)
        .bind(title)
        .bind(content)
        .bind(&cmd.username)
        .bind(Utc::now())
        .bind(image_url)
        .fetch_one(db_manager.pool())
        .await?;

    info!("{:<12} --> 게시물 작성 완료 id: {}", "Command", post_id);
    Ok(post_id)
}

/// 2. 좋아요 토글
pub async fn handle_toggle_like(
    db_manager: &DatabaseManager,
    post_id: i64,
    user_id: i64,
) -> Result<LikeOutcome, PostError> {
    info!(
        "{:<12} --> 좋아요 토글 post: {}, user: {}",
        "Command", post_id, user_id
    );
    db_manager
        .transaction::<_, _, PostError>(|tx| Box::pin(toggle_like(&mut **tx, post_id, user_id)))
        .await
}

async fn toggle_like(
    conn: &mut SqliteConnection,
    post_id: i64,
    user_id: i64,
) -> Result<LikeOutcome, PostError> {
    let removed = sqlx::query(queries::DELETE_LIKE)
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if removed > 0 {
        let likes = sqlx::query_scalar::<_, i64>(queries::DECREMENT_LIKES)
            .bind(post_id)
            .fetch_one(&mut *conn)
            .await?;
        return Ok(LikeOutcome {
            likes,
            liked: false,
        });
    }

    let likes = sqlx::query_scalar::<_, i64>(queries::INCREMENT_LIKES)
        .bind(post_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(PostError::PostNotFound(post_id))?;

    sqlx::query(queries::INSERT_LIKE)
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(LikeOutcome { likes, liked: true })
}

/// 3. 게시물 삭제
pub async fn handle_delete_post(
    db_manager: &DatabaseManager,
    post_id: i64,
    username: String,
) -> Result<(), PostError> {
    info!(
        "{:<12} --> 게시물 삭제 요청 post: {}, user: {}",
        "Command", post_id, username
    );
    db_manager
        .transaction::<_, _, PostError>(|tx| Box::pin(delete_post(&mut **tx, post_id, username)))
        .await
        .inspect_err(|e| warn!("{:<12} --> 게시물 삭제 거절: {}", "Command", e))
}

async fn delete_post(
    conn: &mut SqliteConnection,
    post_id: i64,
    username: String,
) -> Result<(), PostError> {
    let deleted = sqlx::query(queries::DELETE_OPEN_POST)
        .bind(post_id)
        .bind(&username)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if deleted > 0 {
        return Ok(());
    }

    let state = sqlx::query_as::<_, (String, Option<DateTime<Utc>>)>(
        "SELECT username, auction_end_time FROM posts WHERE id = ?1",
    )
    .bind(post_id)
    .fetch_optional(&mut *conn)
    .await?;

    Err(match state {
        None => PostError::PostNotFound(post_id),
        Some((owner, _)) if owner != username => PostError::NotOwner(post_id),
        Some(_) => PostError::AuctionClosed(post_id),
    })
}
// endregion: --- Commands
