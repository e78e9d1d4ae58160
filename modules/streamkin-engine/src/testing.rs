// Test mocks for the recommendation pipeline.
//
// MockGraph implements the SocialGraph seam over HashMaps so the whole
// pipeline runs in-process: no network, no credentials. Builder pattern:
// `.on_channel()`, `.with_followers()`, `.on_followings()`, `.live()`,
// `.with_total()`. Unregistered lookups fail loudly where the real API
// would, and return empty where it would.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};

use streamkin_common::{ChannelProfile, FollowerPage, LiveStream};

use crate::traits::SocialGraph;

/// Page size the mock serves followers in, to exercise cursor handling.
pub const MOCK_PAGE_SZ: usize = 3;

pub struct MockGraph {
    channels: HashMap<String, ChannelProfile>,
    followers: HashMap<String, Vec<String>>,
    followings: HashMap<String, Vec<String>>,
    failing_followings: HashSet<String>,
    live: HashMap<String, LiveStream>,
    totals: HashMap<String, u64>,
    /// Every candidate batch handed to the live-streams lookup, in call order.
    live_calls: Mutex<Vec<Vec<String>>>,
}

impl MockGraph {
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            followers: HashMap::new(),
            followings: HashMap::new(),
            failing_followings: HashSet::new(),
            live: HashMap::new(),
            totals: HashMap::new(),
            live_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_channel(mut self, login: &str, id: &str) -> Self {
        self.channels.insert(
            login.to_string(),
            ChannelProfile {
                id: id.to_string(),
                login: login.to_string(),
                display_name: login.to_string(),
                broadcaster_type: "partner".to_string(),
                profile_image_url: None,
                total_followers: None,
            },
        );
        self
    }

    pub fn with_followers(mut self, channel_id: &str, follower_ids: &[&str]) -> Self {
        self.followers.insert(
            channel_id.to_string(),
            follower_ids.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn on_followings(mut self, follower_id: &str, followed_ids: &[&str]) -> Self {
        self.followings.insert(
            follower_id.to_string(),
            followed_ids.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Make the followings fetch for one follower return an error.
    pub fn failing_followings(mut self, follower_id: &str) -> Self {
        self.failing_followings.insert(follower_id.to_string());
        self
    }

    pub fn live(mut self, user_id: &str, language: &str, viewer_count: u64) -> Self {
        self.live.insert(
            user_id.to_string(),
            LiveStream {
                user_id: user_id.to_string(),
                user_name: format!("user_{user_id}"),
                title: format!("{user_id} live"),
                viewer_count,
                language: language.to_string(),
                started_at: Utc::now() - Duration::hours(1),
                total_followers: None,
            },
        );
        self
    }

    pub fn with_total(mut self, channel_id: &str, total: u64) -> Self {
        self.totals.insert(channel_id.to_string(), total);
        self
    }

    /// Candidate batches observed by the live-streams lookup.
    pub fn live_batches(&self) -> Vec<Vec<String>> {
        self.live_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MockGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialGraph for MockGraph {
    async fn resolve_channel(&self, login: &str) -> Result<Option<ChannelProfile>> {
        Ok(self.channels.get(login).cloned())
    }

    async fn follower_page(
        &self,
        channel_id: &str,
        _first: usize,
        cursor: Option<&str>,
    ) -> Result<FollowerPage> {
        let Some(all) = self.followers.get(channel_id) else {
            bail!("no followers registered for channel {channel_id}");
        };
        let offset: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let end = (offset + MOCK_PAGE_SZ).min(all.len());
        Ok(FollowerPage {
            follower_ids: all[offset..end].to_vec(),
            cursor: (end < all.len()).then(|| end.to_string()),
            total: all.len() as u64,
        })
    }

    async fn capped_followings(&self, follower_id: &str, max: usize) -> Result<Vec<String>> {
        if self.failing_followings.contains(follower_id) {
            bail!("followings fetch failed for {follower_id}");
        }
        let followed = self.followings.get(follower_id).cloned().unwrap_or_default();
        if followed.len() > max {
            return Ok(Vec::new());
        }
        Ok(followed)
    }

    async fn live_streams(&self, candidate_ids: &[String]) -> Result<Vec<LiveStream>> {
        self.live_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(candidate_ids.to_vec());
        Ok(candidate_ids
            .iter()
            .filter_map(|id| self.live.get(id).cloned())
            .collect())
    }

    async fn total_followers(&self, channel_id: &str) -> Result<u64> {
        match self.totals.get(channel_id) {
            Some(total) => Ok(*total),
            None => bail!("no follower total registered for {channel_id}"),
        }
    }
}
