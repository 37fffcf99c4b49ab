//! 입찰 관련 커맨드 처리
//! 1. 입찰
//! 2. 경매 종료(낙찰)
//!
//! Each command runs in one transaction whose first statement is a guarded
//! write. That statement takes the database write lock, so the check and the
//! writes that follow it cannot interleave with another bid or settlement.
//! Timestamps are read after the guard, so they follow the lock order.
// region:    --- Imports
use crate::auction::events::{AuctionSettled, BidPlaced};
use crate::bidding::model::Bid;
use crate::database::DatabaseManager;
use crate::query::queries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use thiserror::Error;
use tracing::{info, warn};
// endregion: --- Imports

#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("Item {0} not found")]
    ItemNotFound(i64),
    #[error("Auction for item {0} is already closed")]
    AuctionClosed(i64),
    #[error("Bid amount must be higher than current price ({current_bid})")]
    BidTooLow { bid_amount: i64, current_bid: i64 },
    #[error("Item {0} not found or you are not the owner")]
    NotOwner(i64),
    #[error("No bids found for item {0}")]
    NoBids(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub item_id: i64,
    pub bidder: String,
    pub bid_amount: i64,
}

/// 경매 종료 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EndAuctionCommand {
    pub item_id: i64,
    pub requester: String,
}

/// 1. 입찰
pub async fn handle_place_bid(
    db_manager: &DatabaseManager,
    cmd: PlaceBidCommand,
) -> Result<BidPlaced, AuctionError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    let event = db_manager
        .transaction::<_, _, AuctionError>(|tx| Box::pin(place_bid(&mut **tx, cmd)))
        .await
        .inspect_err(|e| warn!("{:<12} --> 입찰 거절: {}", "Command", e))?;

    info!("{:<12} --> 입찰 성공: {:?}", "Command", event);
    Ok(event)
}

async fn place_bid(
    conn: &mut SqliteConnection,
    cmd: PlaceBidCommand,
) -> Result<BidPlaced, AuctionError> {
    let raised = sqlx::query_scalar::<_, i64>(queries::RAISE_CURRENT_BID)
        .bind(cmd.bid_amount)
        .bind(cmd.item_id)
        .fetch_optional(&mut *conn)
        .await?;

    if raised.is_none() {
        return Err(bid_rejection(conn, &cmd).await?);
    }
    // 쓰기 잠금을 잡은 뒤의 시각이어야 입찰 시각이 접수 순서와 일치한다
    let now = Utc::now();

    sqlx::query_scalar::<_, i64>(queries::INSERT_BID)
        .bind(cmd.item_id)
        .bind(&cmd.bidder)
        .bind(cmd.bid_amount)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

    Ok(BidPlaced {
        item_id: cmd.item_id,
        bidder: cmd.bidder,
        bid_amount: cmd.bid_amount,
        timestamp: now,
    })
}

/// 입찰가 갱신이 거절된 이유 확인
async fn bid_rejection(
    conn: &mut SqliteConnection,
    cmd: &PlaceBidCommand,
) -> Result<AuctionError, sqlx::Error> {
    let state = sqlx::query_as::<_, (i64, Option<DateTime<Utc>>)>(
        "SELECT current_bid, auction_end_time FROM posts WHERE id = ?1",
    )
    .bind(cmd.item_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(match state {
        None => AuctionError::ItemNotFound(cmd.item_id),
        Some((_, Some(_))) => AuctionError::AuctionClosed(cmd.item_id),
        Some((current_bid, None)) => AuctionError::BidTooLow {
            bid_amount: cmd.bid_amount,
            current_bid,
        },
    })
}

/// 2. 경매 종료(낙찰)
pub async fn handle_end_auction(
    db_manager: &DatabaseManager,
    cmd: EndAuctionCommand,
) -> Result<AuctionSettled, AuctionError> {
    info!("{:<12} --> 경매 종료 요청 처리 시작: {:?}", "Command", cmd);

    let event = db_manager
        .transaction::<_, _, AuctionError>(|tx| Box::pin(settle(&mut **tx, cmd)))
        .await
        .inspect_err(|e| warn!("{:<12} --> 경매 종료 거절: {}", "Command", e))?;

    info!("{:<12} --> 낙찰 완료: {:?}", "Command", event);
    Ok(event)
}

async fn settle(
    conn: &mut SqliteConnection,
    cmd: EndAuctionCommand,
) -> Result<AuctionSettled, AuctionError> {
    let closed = sqlx::query_scalar::<_, i64>(queries::CLOSE_AUCTION)
        .bind(Utc::now())
        .bind(cmd.item_id)
        .bind(&cmd.requester)
        .fetch_optional(&mut *conn)
        .await?;

    if closed.is_none() {
        return Err(settlement_rejection(conn, &cmd).await?);
    }

    // 잠금을 잡은 뒤 종료 시각을 다시 기록한다. 먼저 커밋된 입찰은 모두 이 시각 이전이다.
    let closed_at = Utc::now();
    sqlx::query(queries::STAMP_AUCTION_END)
        .bind(closed_at)
        .bind(cmd.item_id)
        .execute(&mut *conn)
        .await?;

    // 입찰이 없으면 에러 반환, 트랜잭션 롤백으로 종료 시각도 되돌려진다
    let highest = sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
        .bind(cmd.item_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AuctionError::NoBids(cmd.item_id))?;

    sqlx::query(queries::INSERT_SALE)
        .bind(cmd.item_id)
        .bind(&cmd.requester)
        .execute(&mut *conn)
        .await?;

    sqlx::query(queries::INSERT_PURCHASE)
        .bind(cmd.item_id)
        .bind(&highest.username)
        .execute(&mut *conn)
        .await?;

    Ok(AuctionSettled {
        item_id: cmd.item_id,
        seller: cmd.requester,
        buyer: highest.username,
        price: highest.bid_amount,
        timestamp: closed_at,
    })
}

/// 경매 종료가 거절된 이유 확인
async fn settlement_rejection(
    conn: &mut SqliteConnection,
    cmd: &EndAuctionCommand,
) -> Result<AuctionError, sqlx::Error> {
    let state = sqlx::query_as::<_, (String, Option<DateTime<Utc>>)>(
        "SELECT username, auction_end_time FROM posts WHERE id = ?1",
    )
    .bind(cmd.item_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(match state {
        None => AuctionError::ItemNotFound(cmd.item_id),
        Some((owner, _)) if owner != cmd.requester => AuctionError::NotOwner(cmd.item_id),
        Some(_) => AuctionError::AuctionClosed(cmd.item_id),
    })
}
// endregion: --- Commands
