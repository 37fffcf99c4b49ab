//! 외부 인증(Google OAuth) 연동
// region:    --- Imports
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
// endregion: --- Imports

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Identity provider is not configured")]
    NotConfigured,
    #[error("Identity provider rejected the authorization code")]
    InvalidCode,
    #[error("Identity provider request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// 외부 인증 제공자가 돌려준 사용자 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    /// Stable subject id, stored as the user's identity hash.
    pub identity_hash: String,
}

// region:    --- Identity Provider Trait
/// 외부 인증 제공자 트레이트
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to; `state` comes back on the callback.
    fn authorize_url(&self, state: &str) -> Result<String, OAuthError>;

    async fn exchange_code(&self, code: &str) -> Result<ExternalProfile, OAuthError>;
}
// endregion: --- Identity Provider Trait

// region:    --- Google
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    sub: String,
}

impl GoogleIdentityProvider {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    fn ensure_configured(&self) -> Result<(), OAuthError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(OAuthError::NotConfigured);
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorize_url(&self, state: &str) -> Result<String, OAuthError> {
        self.ensure_configured()?;
        let request = self
            .client
            .get(GOOGLE_AUTH_URL)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "profile"),
                ("state", state),
            ])
            .build()?;
        Ok(request.url().to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<ExternalProfile, OAuthError> {
        self.ensure_configured()?;
        info!("{:<12} --> authorization code 교환", "OAuth");

        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        if response.status().is_client_error() {
            return Err(OAuthError::InvalidCode);
        }
        let token: TokenResponse = response.error_for_status()?.json().await?;

        let user_info: UserInfo = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(ExternalProfile {
            identity_hash: user_info.sub,
        })
    }
}
// endregion: --- Google
