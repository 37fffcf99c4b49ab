use crate::bidding::commands::AuctionError;
use crate::oauth::OAuthError;
use crate::posts::commands::PostError;
use crate::users::commands::UserError;
use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("Incoming form rejected: {0}")]
    FormRejection(#[from] FormRejection),
    #[error("User is not logged in or session is invalid")]
    Unauthenticated,
    #[error("Username login is disabled")]
    UsernameLoginDisabled,
    #[error(transparent)]
    Auction(#[from] AuctionError),
    #[error(transparent)]
    Post(#[from] PostError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    OAuth(#[from] OAuthError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_) | ServerError::UsernameLoginDisabled => {
                StatusCode::NOT_FOUND
            }
            ServerError::PathRejection(_)
            | ServerError::JsonRejection(_)
            | ServerError::FormRejection(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServerError::Auction(e) => match e {
                AuctionError::ItemNotFound(_)
                | AuctionError::NotOwner(_)
                | AuctionError::NoBids(_) => StatusCode::NOT_FOUND,
                AuctionError::AuctionClosed(_) | AuctionError::BidTooLow { .. } => {
                    StatusCode::BAD_REQUEST
                }
                AuctionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Post(e) => match e {
                PostError::PostNotFound(_) | PostError::NotOwner(_) => StatusCode::NOT_FOUND,
                PostError::MissingField | PostError::AuctionClosed(_) => StatusCode::BAD_REQUEST,
                PostError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::User(e) => match e {
                UserError::InvalidUsername(_)
                | UserError::UsernameTaken(_)
                | UserError::IdentityAlreadyRegistered => StatusCode::BAD_REQUEST,
                UserError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::OAuth(_) | ServerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
            "Internal Server Error".to_string()
        } else {
            warn!(error = %self, %status, "Replying with error");
            self.to_string()
        };

        let error_response = ErrorResponse {
            success: false,
            message,
        };
        (status, Json(error_response)).into_response()
    }
}
