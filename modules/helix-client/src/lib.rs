pub mod error;
pub mod types;

pub use error::{HelixError, Result};
pub use types::{FollowedEntry, FollowerEntry, HelixResponse, HelixUser, StreamEntry};

use serde::de::DeserializeOwned;

const DEFAULT_BASE_URL: &str = "https://api.twitch.tv/helix";

/// Helix caps page sizes at 100 items per request.
const MAX_PAGE_SZ: usize = 100;

pub struct HelixClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    token: String,
}

impl HelixClient {
    pub fn new(client_id: String, token: String) -> Self {
        Self::with_base_url(client_id, token, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a non-default base URL (local stub servers).
    pub fn with_base_url(client_id: String, token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            token,
        }
    }

    /// Look up a user by login. Returns `None` when the login does not exist
    /// (Helix responds 200 with an empty `data` array, not a 404).
    pub async fn get_user_by_login(&self, login: &str) -> Result<Option<HelixUser>> {
        let url = format!("{}/users?login={}", self.base_url, login);
        let reply: HelixResponse<HelixUser> = self.get_json(&url).await?;
        Ok(reply.data.into_iter().next())
    }

    /// Fetch one page of a broadcaster's followers. The reply carries the
    /// channel-wide follower total and a cursor for the next page.
    pub async fn get_followers(
        &self,
        broadcaster_id: &str,
        first: usize,
        after: Option<&str>,
    ) -> Result<HelixResponse<FollowerEntry>> {
        let mut url = format!(
            "{}/channels/followers?broadcaster_id={}&first={}",
            self.base_url,
            broadcaster_id,
            first.min(MAX_PAGE_SZ)
        );
        if let Some(cursor) = after {
            url.push_str(&format!("&after={cursor}"));
        }
        self.get_json(&url).await
    }

    /// Fetch the channels a user follows, capped at `max` total followings.
    ///
    /// Returns an empty list when the user follows more than `max` channels —
    /// callers treat that as "skip, do not count" (an account following
    /// thousands of channels says little about audience taste).
    pub async fn get_capped_followings(
        &self,
        user_id: &str,
        max: usize,
    ) -> Result<Vec<FollowedEntry>> {
        let mut collected: Vec<FollowedEntry> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/channels/followed?user_id={}&first={}",
                self.base_url,
                user_id,
                MAX_PAGE_SZ
            );
            if let Some(c) = &cursor {
                url.push_str(&format!("&after={c}"));
            }
            let reply: HelixResponse<FollowedEntry> = self.get_json(&url).await?;

            if reply.total.unwrap_or(0) > max as u64 {
                tracing::debug!(user_id, total = reply.total, max, "Follows over cap, skipping");
                return Ok(Vec::new());
            }

            cursor = reply.cursor();
            collected.extend(reply.data);
            if cursor.is_none() || collected.len() >= max {
                break;
            }
        }

        Ok(collected)
    }

    /// Fetch live streams for a set of candidate channels. The endpoint
    /// accepts at most 100 ids per request, so larger sets take one call per
    /// 100-id chunk; no candidate is dropped.
    pub async fn get_streams(&self, user_ids: &[String]) -> Result<Vec<StreamEntry>> {
        let mut streams = Vec::new();
        for url in stream_urls(&self.base_url, user_ids) {
            let reply: HelixResponse<StreamEntry> = self.get_json(&url).await?;
            streams.extend(reply.data);
        }
        Ok(streams)
    }

    /// Total follower count for a broadcaster. One minimal-page request; only
    /// the `total` field of the reply is of interest.
    pub async fn get_total_followers(&self, broadcaster_id: &str) -> Result<u64> {
        let url = format!(
            "{}/channels/followers?broadcaster_id={}&first=1",
            self.base_url, broadcaster_id
        );
        let reply: HelixResponse<FollowerEntry> = self.get_json(&url).await?;
        Ok(reply.total.unwrap_or(0))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Client-Id", &self.client_id)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HelixError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json::<T>().await?)
    }
}

/// One `/streams` URL per chunk of ids, respecting the per-request cap.
fn stream_urls(base_url: &str, user_ids: &[String]) -> Vec<String> {
    user_ids
        .chunks(MAX_PAGE_SZ)
        .map(|chunk| {
            let params: Vec<String> =
                chunk.iter().map(|id| format!("user_id={id}")).collect();
            format!("{base_url}/streams?{}", params.join("&"))
        })
        .collect()
}
