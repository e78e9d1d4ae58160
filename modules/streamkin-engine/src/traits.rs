// Trait abstraction for the remote social graph.
//
// SocialGraph is the one seam between the pipeline and the network: every
// stage does its remote work through it. The production implementation wraps
// HelixClient; tests swap in a HashMap-backed MockGraph so the whole pipeline
// runs without a network.

use anyhow::Result;
use async_trait::async_trait;

use streamkin_common::{ChannelProfile, FollowerPage, LiveStream};

#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Resolve a validated login to a channel profile.
    /// `Ok(None)` means the login does not exist.
    async fn resolve_channel(&self, login: &str) -> Result<Option<ChannelProfile>>;

    /// One page of a channel's followers, with cursor and channel-wide total.
    async fn follower_page(
        &self,
        channel_id: &str,
        first: usize,
        cursor: Option<&str>,
    ) -> Result<FollowerPage>;

    /// Ids of the channels a follower follows, or an empty list when the
    /// follower is over the `max` cap ("skip, do not count").
    async fn capped_followings(&self, follower_id: &str, max: usize) -> Result<Vec<String>>;

    /// Live streams among a batch of candidate channel ids.
    async fn live_streams(&self, candidate_ids: &[String]) -> Result<Vec<LiveStream>>;

    /// Total follower count for one channel.
    async fn total_followers(&self, channel_id: &str) -> Result<u64>;
}

#[async_trait]
impl SocialGraph for helix_client::HelixClient {
    async fn resolve_channel(&self, login: &str) -> Result<Option<ChannelProfile>> {
        let user = self.get_user_by_login(login).await?;
        Ok(user.map(|u| ChannelProfile {
            id: u.id,
            login: u.login,
            display_name: u.display_name,
            broadcaster_type: u.broadcaster_type,
            profile_image_url: u.profile_image_url,
            total_followers: None,
        }))
    }

    async fn follower_page(
        &self,
        channel_id: &str,
        first: usize,
        cursor: Option<&str>,
    ) -> Result<FollowerPage> {
        let reply = self.get_followers(channel_id, first, cursor).await?;
        let cursor = reply.cursor();
        Ok(FollowerPage {
            follower_ids: reply.data.into_iter().map(|f| f.user_id).collect(),
            cursor,
            total: reply.total.unwrap_or(0),
        })
    }

    async fn capped_followings(&self, follower_id: &str, max: usize) -> Result<Vec<String>> {
        let followed = self.get_capped_followings(follower_id, max).await?;
        Ok(followed.into_iter().map(|f| f.broadcaster_id).collect())
    }

    async fn live_streams(&self, candidate_ids: &[String]) -> Result<Vec<LiveStream>> {
        let streams = self.get_streams(candidate_ids).await?;
        Ok(streams
            .into_iter()
            .map(|s| LiveStream {
                user_id: s.user_id,
                user_name: s.user_name,
                title: s.title,
                viewer_count: s.viewer_count,
                language: s.language,
                started_at: s.started_at,
                total_followers: None,
            })
            .collect())
    }

    async fn total_followers(&self, channel_id: &str) -> Result<u64> {
        Ok(self.get_total_followers(channel_id).await?)
    }
}
