// region:    --- Imports
use crate::config::Config;
use crate::database::DatabaseManager;
use crate::error::ServerError;
use crate::oauth::IdentityProvider;
use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
// endregion: --- Imports

// region:    --- Modules
mod auction;
mod auth;
mod posts;
mod profile;
// endregion: --- Modules

const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db_manager: Arc<DatabaseManager>,
    pub config: Arc<Config>,
    pub identity_provider: Arc<dyn IdentityProvider>,
}

// region:    --- Router
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(posts::handle_home))
        .route("/login", get(auth::handle_login_page).post(auth::handle_login))
        .route(
            "/register",
            get(auth::handle_register_page).post(auth::handle_register),
        )
        .route("/auth/google", get(auth::handle_google_login))
        .route("/auth/google/callback", get(auth::handle_google_callback))
        .route("/logout", get(auth::handle_logout))
        .route("/posts", post(posts::handle_create_post))
        .route("/like/:id", post(posts::handle_like))
        .route("/delete/:id", post(posts::handle_delete))
        .route("/item/:id", get(posts::handle_get_item))
        .route("/avatar/:username", get(posts::handle_avatar))
        .route("/bid/:id", post(auction::handle_bid))
        .route("/end-auction/:id", post(auction::handle_end_auction))
        .route("/profile", get(profile::handle_profile))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback(uri: Uri) -> ServerError {
    ServerError::UnknownRoute(uri)
}
// endregion: --- Router
