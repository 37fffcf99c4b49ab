// region:    --- Imports
use super::AppState;
use crate::avatar::render_avatar;
use crate::bidding::model::{Bid, Post};
use crate::error::{Result, ServerError};
use crate::posts::commands::{
    handle_create_post as command_handle_create_post, handle_delete_post, handle_toggle_like,
    CreatePostCommand, PostError,
};
use crate::query::handlers::{
    get_highest_bid, get_item_bids, get_post, get_post_liked_by, get_post_purchases,
    get_post_sales, get_posts, SortBy,
};
use crate::session::extract::{AuthenticatedUser, MaybeUser};
use crate::users::model::User;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

// region:    --- Request / Response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostForm {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    posts: Vec<Post>,
    user: Option<User>,
    logged_in: bool,
    sort_by: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    item: Post,
    closed: bool,
    bids: Vec<Bid>,
    highest_bid: Option<Bid>,
    liked_by: Vec<i64>,
    seller: Option<String>,
    buyer: Option<String>,
    user: Option<User>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    success: bool,
    likes: i64,
    liked: bool,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    success: bool,
}
// endregion: --- Request / Response

/// 메인 페이지: 전체 게시물 목록
pub async fn handle_home(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(params): Query<ListParams>,
) -> Result<Json<HomePage>> {
    let sort_by = SortBy::parse(params.sort_by.as_deref());
    info!("{:<12} --> 게시물 목록 sortBy: {}", "Handler", sort_by.as_str());

    let posts = get_posts(&state.db_manager, sort_by).await?;
    Ok(Json(HomePage {
        posts,
        logged_in: user.is_some(),
        user,
        sort_by: sort_by.as_str(),
    }))
}

/// 게시물 작성 후 상세 페이지로 이동
pub async fn handle_create_post(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    WithRejection(Form(form), _): WithRejection<Form<CreatePostForm>, ServerError>,
) -> Result<Redirect> {
    info!("{:<12} --> 게시물 작성 user: {}", "Handler", user.username);

    let cmd = CreatePostCommand {
        title: form.title,
        content: form.content,
        username: user.username,
        image_url: form.image_url,
    };
    let post_id = command_handle_create_post(&state.db_manager, cmd).await?;
    Ok(Redirect::to(&format!("/item/{post_id}")))
}

/// 좋아요 토글
pub async fn handle_like(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    WithRejection(Path(post_id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<Json<LikeResponse>> {
    info!(
        "{:<12} --> 좋아요 post: {}, user: {}",
        "Handler", post_id, user.username
    );

    let outcome = handle_toggle_like(&state.db_manager, post_id, user.id).await?;
    Ok(Json(LikeResponse {
        success: true,
        likes: outcome.likes,
        liked: outcome.liked,
    }))
}

/// 게시물 삭제
pub async fn handle_delete(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    WithRejection(Path(post_id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<Json<SuccessResponse>> {
    info!(
        "{:<12} --> 게시물 삭제 post: {}, user: {}",
        "Handler", post_id, user.username
    );

    handle_delete_post(&state.db_manager, post_id, user.username).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// 상품 상세: 입찰 내역과 낙찰자 포함
pub async fn handle_get_item(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    WithRejection(Path(post_id), _): WithRejection<Path<i64>, ServerError>,
) -> Result<Json<ItemPage>> {
    info!("{:<12} --> 상품 상세 조회 post: {}", "Handler", post_id);

    let item = get_post(&state.db_manager, post_id)
        .await?
        .ok_or(PostError::PostNotFound(post_id))?;
    let bids = get_item_bids(&state.db_manager, post_id).await?;
    let highest_bid = get_highest_bid(&state.db_manager, post_id).await?;
    let liked_by = get_post_liked_by(&state.db_manager, post_id).await?;

    // 종료된 경매만 판매/구매 기록을 가진다
    let (seller, buyer) = if item.is_closed() {
        let seller = get_post_sales(&state.db_manager, post_id)
            .await?
            .into_iter()
            .next()
            .map(|sale| sale.username);
        let buyer = get_post_purchases(&state.db_manager, post_id)
            .await?
            .into_iter()
            .next()
            .map(|purchase| purchase.username);
        (seller, buyer)
    } else {
        (None, None)
    };

    Ok(Json(ItemPage {
        closed: item.is_closed(),
        item,
        bids,
        highest_bid,
        liked_by,
        seller,
        buyer,
        user,
    }))
}

/// 이니셜 아바타 이미지
pub async fn handle_avatar(Path(username): Path<String>) -> Response {
    match render_avatar(&username) {
        Some(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
