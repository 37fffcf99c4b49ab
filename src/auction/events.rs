use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 입찰 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidPlaced {
    pub item_id: i64,
    pub bidder: String,
    pub bid_amount: i64,
    pub timestamp: DateTime<Utc>,
}

// 낙찰(경매 종료) 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSettled {
    pub item_id: i64,
    pub seller: String,
    pub buyer: String,
    pub price: i64,
    /// Same instant as the post's `auction_end_time`.
    pub timestamp: DateTime<Utc>,
}
