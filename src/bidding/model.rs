use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 상품(게시물) 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub image_url: Option<String>,
    pub current_bid: i64,
    pub auction_end_time: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_closed(&self) -> bool {
        self.auction_end_time.is_some()
    }
}

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: i64,
    pub item_id: i64,
    pub username: String,
    pub bid_amount: i64,
    pub bid_time: DateTime<Utc>,
}

/// 사용자의 입찰 내역 (입찰한 상품 + 입찰 금액)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserBid {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: Post,
    pub bid_amount: i64,
}

/// 판매/구매 기록. `sales` 와 `purchases` 테이블이 같은 형태를 공유한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: i64,
    pub post_id: i64,
    pub username: String,
}
