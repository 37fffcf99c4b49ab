// region:    --- Imports
use super::posts::ListParams;
use super::AppState;
use crate::bidding::model::{Post, UserBid};
use crate::error::Result;
use crate::query::handlers::{
    get_user_bids, get_user_posts, get_user_purchases, get_user_sales, SortBy,
};
use crate::session::extract::MaybeUser;
use crate::users::model::User;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use tracing::info;
// endregion: --- Imports

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePage {
    user: User,
    posts: Vec<Post>,
    bids: Vec<UserBid>,
    sales: Vec<Post>,
    purchases: Vec<Post>,
    sort_by: &'static str,
}

/// 내 프로필: 진행 중 게시물, 입찰, 판매, 구매 내역
pub async fn handle_profile(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    let Some(user) = user else {
        return Ok(Redirect::to("/login").into_response());
    };
    let sort_by = SortBy::parse(params.sort_by.as_deref());
    info!(
        "{:<12} --> 프로필 조회 user: {}, sortBy: {}",
        "Handler",
        user.username,
        sort_by.as_str()
    );

    let db = &state.db_manager;
    let posts = get_user_posts(db, &user.username, sort_by).await?;
    let bids = get_user_bids(db, &user.username).await?;
    let sales = get_user_sales(db, &user.username).await?;
    let purchases = get_user_purchases(db, &user.username).await?;

    Ok(Json(ProfilePage {
        user,
        posts,
        bids,
        sales,
        purchases,
        sort_by: sort_by.as_str(),
    })
    .into_response())
}
