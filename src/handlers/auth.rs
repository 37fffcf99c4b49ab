//! 로그인, 회원가입, 외부 인증 콜백
// region:    --- Imports
use super::AppState;
use crate::error::{Result, ServerError};
use crate::query::handlers::{find_user_by_identity, find_user_by_username};
use crate::session::extract::{CurrentSession, MaybeUser};
use crate::session::{
    create_session, destroy_session, generate_token, OAUTH_STATE_COOKIE, SESSION_COOKIE,
};
use crate::users::commands::{handle_register_user, RegisterUserCommand, UserError};
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::{Form, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

const OAUTH_STATE_PATH: &str = "/auth/google";
const OAUTH_FAILURE_REDIRECT: &str = "/login?error=oauth-failed";

// region:    --- Request / Response
#[derive(Debug, Default, Deserialize)]
pub struct ErrorParams {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsernameForm {
    pub username: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    login_error: Option<String>,
    google_login: &'static str,
    username_login: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPage {
    reg_error: Option<String>,
    /// A session exists whose identity has no username yet.
    pending: bool,
}
// endregion: --- Request / Response

// region:    --- Cookies
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn oauth_state_cookie(state: String) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, state))
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// 기존 세션이 있으면 정리하고 새 세션 쿠키를 붙인다.
async fn start_session(state: &AppState, jar: CookieJar, identity_hash: &str) -> Result<CookieJar> {
    if let Some(old) = jar.get(SESSION_COOKIE) {
        destroy_session(&state.db_manager, old.value()).await?;
    }
    let session = create_session(&state.db_manager, identity_hash, state.config.session_ttl()).await?;
    Ok(jar.add(session_cookie(session.token)))
}
// endregion: --- Cookies

// region:    --- Pages
pub async fn handle_login_page(
    State(state): State<AppState>,
    Query(params): Query<ErrorParams>,
) -> Json<LoginPage> {
    Json(LoginPage {
        login_error: params.error,
        google_login: OAUTH_STATE_PATH,
        username_login: state.config.allow_username_login,
    })
}

pub async fn handle_register_page(
    CurrentSession(session): CurrentSession,
    MaybeUser(user): MaybeUser,
    Query(params): Query<ErrorParams>,
) -> Json<RegisterPage> {
    Json(RegisterPage {
        reg_error: params.error,
        pending: session.is_some() && user.is_none(),
    })
}
// endregion: --- Pages

// region:    --- Username Login / Register
/// 사용자 이름만으로 로그인 (설정으로 켠 경우만)
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Form(form), _): WithRejection<Form<UsernameForm>, ServerError>,
) -> Result<(CookieJar, Redirect)> {
    if !state.config.allow_username_login {
        return Err(ServerError::UsernameLoginDisabled);
    }
    info!("{:<12} --> 사용자 이름 로그인: {}", "Handler", form.username);

    let Some(user) = find_user_by_username(&state.db_manager, form.username.trim()).await? else {
        warn!("{:<12} --> 알 수 없는 사용자: {}", "Handler", form.username);
        return Ok((jar, Redirect::to("/login?error=unknown-user")));
    };

    let jar = start_session(&state, jar, &user.identity_hash).await?;
    Ok((jar, Redirect::to("/")))
}

/// 인증된 신원에 사용자 이름 등록
pub async fn handle_register(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    WithRejection(Form(form), _): WithRejection<Form<UsernameForm>, ServerError>,
) -> Result<Redirect> {
    let Some(session) = session else {
        return Ok(Redirect::to("/login"));
    };
    info!("{:<12} --> 사용자 이름 등록: {}", "Handler", form.username);

    let cmd = RegisterUserCommand {
        username: form.username,
        identity_hash: session.identity_hash,
    };
    match handle_register_user(&state.db_manager, cmd).await {
        Ok(_) | Err(UserError::IdentityAlreadyRegistered) => Ok(Redirect::to("/")),
        Err(UserError::UsernameTaken(_)) => Ok(Redirect::to("/register?error=username-taken")),
        Err(UserError::InvalidUsername(_)) => {
            Ok(Redirect::to("/register?error=invalid-username"))
        }
        Err(e @ UserError::Database(_)) => Err(e.into()),
    }
}
// endregion: --- Username Login / Register

// region:    --- External Identity
/// 외부 인증 시작: state 쿠키를 남기고 제공자로 이동
pub async fn handle_google_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let oauth_state = generate_token();
    let url = state.identity_provider.authorize_url(&oauth_state)?;
    info!("{:<12} --> 외부 인증 시작", "Handler");

    Ok((jar.add(oauth_state_cookie(oauth_state)), Redirect::to(&url)))
}

/// 외부 인증 콜백: 가입된 신원은 홈으로, 아니면 회원가입으로
pub async fn handle_google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let expected = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path(OAUTH_STATE_PATH));

    if let Some(error) = params.error {
        warn!("{:<12} --> 외부 인증 거부: {}", "Handler", error);
        return Ok((jar, Redirect::to(OAUTH_FAILURE_REDIRECT)));
    }
    let (Some(code), Some(returned)) = (params.code, params.state) else {
        warn!("{:<12} --> 외부 인증 콜백 파라미터 누락", "Handler");
        return Ok((jar, Redirect::to(OAUTH_FAILURE_REDIRECT)));
    };
    if expected.as_deref() != Some(returned.as_str()) {
        warn!("{:<12} --> 외부 인증 state 불일치", "Handler");
        return Ok((jar, Redirect::to(OAUTH_FAILURE_REDIRECT)));
    }

    let profile = match state.identity_provider.exchange_code(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("{:<12} --> 외부 인증 실패: {}", "Handler", e);
            return Ok((jar, Redirect::to(OAUTH_FAILURE_REDIRECT)));
        }
    };

    let jar = start_session(&state, jar, &profile.identity_hash).await?;
    let registered = find_user_by_identity(&state.db_manager, &profile.identity_hash)
        .await?
        .is_some();
    info!("{:<12} --> 외부 인증 성공, 가입 여부: {}", "Handler", registered);

    let target = if registered { "/" } else { "/register" };
    Ok((jar, Redirect::to(target)))
}

/// 로그아웃
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        destroy_session(&state.db_manager, cookie.value()).await?;
    }
    info!("{:<12} --> 로그아웃", "Handler");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::to("/login")))
}
// endregion: --- External Identity
