use super::{find_session, Session, SESSION_COOKIE};
use crate::error::ServerError;
use crate::handlers::AppState;
use crate::query::handlers::find_user_by_identity;
use crate::users::model::User;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

/// The live session named by the `sid` cookie, if any.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

/// A session whose identity has a registered user. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Like [`AuthenticatedUser`] but never rejects for a missing login.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(Self(None));
        };

        let session = find_session(&state.db_manager, cookie.value()).await?;
        Ok(Self(session))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        let Some(session) = session else {
            return Ok(Self(None));
        };

        let user = find_user_by_identity(&state.db_manager, &session.identity_hash).await?;
        Ok(Self(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        user.map(Self).ok_or(ServerError::Unauthenticated)
    }
}
