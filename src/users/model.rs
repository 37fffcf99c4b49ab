use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const USERNAME_MAX_LEN: usize = 50;

// 사용자 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub identity_hash: String,
    pub avatar_url: Option<String>,
    pub member_since: DateTime<Utc>,
}

/// Trims `raw` and checks it is 1..=50 ASCII alphanumerics, `_` or `-`.
pub fn normalize_username(raw: &str) -> Option<String> {
    let username = raw.trim();
    let valid = !username.is_empty()
        && username.chars().count() <= USERNAME_MAX_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then(|| username.to_string())
}
