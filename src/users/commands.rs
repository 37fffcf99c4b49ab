//! 사용자 관련 커맨드 처리
//! 1. 사용자 이름 등록
// region:    --- Imports
use super::model::{normalize_username, User};
use crate::database::DatabaseManager;
use crate::query::queries;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
// endregion: --- Imports

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Username is invalid: {0:?}")]
    InvalidUsername(String),
    #[error("Username already taken: {0}")]
    UsernameTaken(String),
    #[error("This identity is already registered")]
    IdentityAlreadyRegistered,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

// region:    --- Commands
/// 사용자 이름 등록 명령
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub username: String,
    pub identity_hash: String,
}

/// 1. 사용자 이름 등록
pub async fn handle_register_user(
    db_manager: &DatabaseManager,
    cmd: RegisterUserCommand,
) -> Result<User, UserError> {
    info!("{:<12} --> 사용자 등록 요청: {}", "Command", cmd.username);

    let username =
        normalize_username(&cmd.username).ok_or(UserError::InvalidUsername(cmd.username))?;

    let result = sqlx::query_as::<_, User>(queries::INSERT_USER)
        .bind(&username)
        .bind(&cmd.identity_hash)
        .bind(Utc::now())
        .fetch_one(db_manager.pool())
        .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!("{:<12} --> 중복 등록 시도: {}", "Command", e.message());
            // 어느 UNIQUE 제약이 걸렸는지 확인
            let taken = sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
                .bind(&username)
                .fetch_optional(db_manager.pool())
                .await?;
            match taken {
                Some(_) => Err(UserError::UsernameTaken(username)),
                None => Err(UserError::IdentityAlreadyRegistered),
            }
        }
        Err(e) => Err(e.into()),
    }
}
// endregion: --- Commands
