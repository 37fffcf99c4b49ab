// region:    --- Imports
use super::queries;
use crate::bidding::model::{Bid, LedgerEntry, Post, UserBid};
use crate::database::DatabaseManager;
use crate::users::model::User;
use sqlx::Error as SqlxError;
use tracing::info;

// endregion: --- Imports

// region:    --- Sorting

/// 게시물 정렬 기준. 알 수 없는 값은 최신순으로 처리한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Newest,
    Oldest,
    MostLikes,
    LeastLikes,
}

impl SortBy {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => SortBy::Oldest,
            Some("most-likes") => SortBy::MostLikes,
            Some("least-likes") => SortBy::LeastLikes,
            _ => SortBy::Newest,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
            SortBy::MostLikes => "most-likes",
            SortBy::LeastLikes => "least-likes",
        }
    }

    /// Ids grow with creation time, so they order posts chronologically.
    fn order_clause(self) -> &'static str {
        match self {
            SortBy::Newest => " ORDER BY id DESC",
            SortBy::Oldest => " ORDER BY id ASC",
            SortBy::MostLikes => " ORDER BY likes DESC, id DESC",
            SortBy::LeastLikes => " ORDER BY likes ASC, id DESC",
        }
    }
}

// endregion: --- Sorting

// region:    --- Query Handlers

/// 모든 게시물 조회
pub async fn get_posts(db_manager: &DatabaseManager, sort_by: SortBy) -> Result<Vec<Post>, SqlxError> {
    info!("{:<12} --> 모든 게시물 조회 sort: {}", "Query", sort_by.as_str());
    let sql = format!("{}{}", queries::GET_ALL_POSTS, sort_by.order_clause());
    sqlx::query_as::<_, Post>(&sql)
        .fetch_all(db_manager.pool())
        .await
}

/// 게시물 조회
pub async fn get_post(db_manager: &DatabaseManager, post_id: i64) -> Result<Option<Post>, SqlxError> {
    info!("{:<12} --> 게시물 조회 id: {}", "Query", post_id);
    sqlx::query_as::<_, Post>(queries::GET_POST)
        .bind(post_id)
        .fetch_optional(db_manager.pool())
        .await
}

/// 게시물 좋아요 사용자 조회
pub async fn get_post_liked_by(
    db_manager: &DatabaseManager,
    post_id: i64,
) -> Result<Vec<i64>, SqlxError> {
    sqlx::query_scalar::<_, i64>(queries::GET_POST_LIKED_BY)
        .bind(post_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 상품 입찰 이력 조회
pub async fn get_item_bids(db_manager: &DatabaseManager, item_id: i64) -> Result<Vec<Bid>, SqlxError> {
    info!("{:<12} --> 상품 입찰 이력 조회 id: {}", "Query", item_id);
    sqlx::query_as::<_, Bid>(queries::GET_ITEM_BIDS)
        .bind(item_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 최고 입찰 조회
pub async fn get_highest_bid(
    db_manager: &DatabaseManager,
    item_id: i64,
) -> Result<Option<Bid>, SqlxError> {
    info!("{:<12} --> 최고 입찰 조회 id: {}", "Query", item_id);
    sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
        .bind(item_id)
        .fetch_optional(db_manager.pool())
        .await
}

/// 상품 판매 기록 조회
pub async fn get_post_sales(
    db_manager: &DatabaseManager,
    post_id: i64,
) -> Result<Vec<LedgerEntry>, SqlxError> {
    sqlx::query_as::<_, LedgerEntry>(queries::GET_POST_SALES)
        .bind(post_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 상품 구매 기록 조회
pub async fn get_post_purchases(
    db_manager: &DatabaseManager,
    post_id: i64,
) -> Result<Vec<LedgerEntry>, SqlxError> {
    sqlx::query_as::<_, LedgerEntry>(queries::GET_POST_PURCHASES)
        .bind(post_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 사용자의 진행 중인 게시물 조회
pub async fn get_user_posts(
    db_manager: &DatabaseManager,
    username: &str,
    sort_by: SortBy,
) -> Result<Vec<Post>, SqlxError> {
    info!("{:<12} --> 사용자 게시물 조회 user: {}", "Query", username);
    let sql = format!("{}{}", queries::GET_USER_OPEN_POSTS, sort_by.order_clause());
    sqlx::query_as::<_, Post>(&sql)
        .bind(username)
        .fetch_all(db_manager.pool())
        .await
}

/// 사용자의 진행 중인 경매 입찰 내역 조회
pub async fn get_user_bids(
    db_manager: &DatabaseManager,
    username: &str,
) -> Result<Vec<UserBid>, SqlxError> {
    info!("{:<12} --> 사용자 입찰 내역 조회 user: {}", "Query", username);
    sqlx::query_as::<_, UserBid>(queries::GET_USER_BIDS)
        .bind(username)
        .fetch_all(db_manager.pool())
        .await
}

/// 사용자 판매 내역 조회
pub async fn get_user_sales(
    db_manager: &DatabaseManager,
    username: &str,
) -> Result<Vec<Post>, SqlxError> {
    sqlx::query_as::<_, Post>(queries::GET_USER_SALES)
        .bind(username)
        .fetch_all(db_manager.pool())
        .await
}

/// 사용자 구매 내역 조회
pub async fn get_user_purchases(
    db_manager: &DatabaseManager,
    username: &str,
) -> Result<Vec<Post>, SqlxError> {
    sqlx::query_as::<_, Post>(queries::GET_USER_PURCHASES)
        .bind(username)
        .fetch_all(db_manager.pool())
        .await
}

pub async fn find_user_by_username(
    db_manager: &DatabaseManager,
    username: &str,
) -> Result<Option<User>, SqlxError> {
    sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
        .bind(username)
        .fetch_optional(db_manager.pool())
        .await
}

pub async fn find_user_by_identity(
    db_manager: &DatabaseManager,
    identity_hash: &str,
) -> Result<Option<User>, SqlxError> {
    sqlx::query_as::<_, User>(queries::GET_USER_BY_IDENTITY)
        .bind(identity_hash)
        .fetch_optional(db_manager.pool())
        .await
}

// endregion: --- Query Handlers
