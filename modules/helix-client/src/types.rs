use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Standard Helix envelope: a `data` array, an optional channel-wide `total`,
/// and an optional pagination cursor.
#[derive(Debug, Clone, Deserialize)]
pub struct HelixResponse<T> {
    pub data: Vec<T>,
    pub total: Option<u64>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub cursor: Option<String>,
}

impl<T> HelixResponse<T> {
    pub fn cursor(&self) -> Option<String> {
        self.pagination.as_ref().and_then(|p| p.cursor.clone())
    }
}

/// A user record from `GET /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct HelixUser {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(default)]
    pub broadcaster_type: String,
    pub profile_image_url: Option<String>,
}

/// One follower of a broadcaster, from `GET /channels/followers`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowerEntry {
    pub user_id: String,
    pub user_name: Option<String>,
    pub followed_at: Option<DateTime<Utc>>,
}

/// One channel a user follows, from `GET /channels/followed`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowedEntry {
    pub broadcaster_id: String,
    pub broadcaster_login: Option<String>,
    pub followed_at: Option<DateTime<Utc>>,
}

/// A live stream from `GET /streams`.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamEntry {
    pub user_id: String,
    pub user_name: String,
    pub title: String,
    pub viewer_count: u64,
    pub language: String,
    pub started_at: DateTime<Utc>,
}
