// region:    --- Imports
use super::AppState;
use crate::bidding::commands::{
    handle_end_auction as command_handle_end_auction, handle_place_bid, EndAuctionCommand,
    PlaceBidCommand,
};
use crate::error::{Result, ServerError};
use crate::session::extract::AuthenticatedUser;
use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRequest {
    pub bid_amount: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidResponse {
    success: bool,
    current_bid: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndAuctionResponse {
    success: bool,
    buyer: String,
    final_price: i64,
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    WithRejection(Path(item_id), _): WithRejection<Path<i64>, ServerError>,
    WithRejection(Json(request), _): WithRejection<Json<BidRequest>, ServerError>,
) -> Result<Json<BidResponse>> {
    info!(
        "{:<12} --> 입찰 요청 item: {}, user: {}",
        "Handler", item_id, user.username
    );

    let cmd = PlaceBidCommand {
        item_id,
        bidder: user.username,
        bid_amount: request.bid_amount,
    };
    let placed = handle_place_bid(&state.db_manager, cmd).await?;

    Ok(Json(BidResponse {
        success: true,
        current_bid: placed.bid_amount,
    }))
}

/// 경매 종료 요청 처리
pub async fn handle_end_auction(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    WithRejection(Path(item_id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<Json<EndAuctionResponse>> {
    info!(
        "{:<12} --> 경매 종료 요청 item: {}, user: {}",
        "Handler", item_id, user.username
    );

    let cmd = EndAuctionCommand {
        item_id,
        requester: user.username,
    };
    let settled = command_handle_end_auction(&state.db_manager, cmd).await?;

    Ok(Json(EndAuctionResponse {
        success: true,
        buyer: settled.buyer,
        final_price: settled.price,
    }))
}
