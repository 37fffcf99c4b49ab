use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("SESSION_TTL_HOURS must be between 1 and {max}, got {0}", max = MAX_SESSION_TTL_HOURS)]
    InvalidSessionTtl(i64),
}

/// Ten years.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

/// 서버 설정. 각 필드는 같은 이름의 대문자 환경 변수에서 읽는다.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_server_address")]
    pub server_address: IpAddr,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    /// Externally visible base URL, used to build the OAuth redirect URI.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    #[serde(default)]
    pub google_client_id: String,
    #[serde(default)]
    pub google_client_secret: String,
    #[serde(default)]
    pub allow_username_login: bool,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if e.not_found() {
                debug!("{:<12} --> No .env file found", "Config");
            } else {
                return Err(e.into());
            }
        }

        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 값 범위 확인
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ttl_hours = self.session_ttl_hours;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours)
            || chrono::TimeDelta::try_hours(ttl_hours).is_none()
        {
            return Err(ConfigError::InvalidSessionTtl(ttl_hours));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_address, self.server_port)
    }

    pub fn oauth_redirect_uri(&self) -> String {
        format!("{}/auth/google/callback", self.public_url.trim_end_matches('/'))
    }

    /// Clamped to the range `validate` accepts, so it never overflows.
    pub fn session_ttl(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::hours(self.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            database_max_connections: default_database_max_connections(),
            server_address: default_server_address(),
            server_port: default_server_port(),
            public_url: default_public_url(),
            google_client_id: String::new(),
            google_client_secret: String::new(),
            allow_username_login: false,
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://bidboard.db".to_string()
}

fn default_database_max_connections() -> u32 {
    5
}

fn default_server_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_server_port() -> u16 {
    3000
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_session_ttl_hours() -> i64 {
    24
}
