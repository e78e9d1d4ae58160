use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved streaming channel — the origin of a recommendation run.
///
/// Built once from the remote user lookup before any pipeline work starts.
/// `total_followers` is filled in by the first follower page (the remote API
/// reports the total alongside the page) and stays `None` until then.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub id: String,
    pub login: String,
    pub display_name: String,
    pub broadcaster_type: String,
    pub profile_image_url: Option<String>,
    pub total_followers: Option<u64>,
}

/// One page of a channel's followers, plus the cursor to the next page and
/// the channel-wide total reported by the API.
#[derive(Debug, Clone, Default)]
pub struct FollowerPage {
    pub follower_ids: Vec<String>,
    pub cursor: Option<String>,
    pub total: u64,
}

/// A live stream record for a candidate channel.
///
/// `total_followers` is absent until the enrichment stage fills it; every
/// other field comes straight from the live-streams lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStream {
    pub user_id: String,
    pub user_name: String,
    pub title: String,
    pub viewer_count: u64,
    pub language: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub total_followers: Option<u64>,
}

impl LiveStream {
    /// Human-readable elapsed duration relative to `base_time`, e.g. "3hr 21 min".
    /// Streams that report a future start time clamp to zero.
    pub fn duration_since(&self, base_time: DateTime<Utc>) -> String {
        let secs = (base_time - self.started_at).num_seconds().max(0);
        format!("{}hr {} min", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stream(started_at: DateTime<Utc>) -> LiveStream {
        LiveStream {
            user_id: "1".into(),
            user_name: "one".into(),
            title: "t".into(),
            viewer_count: 0,
            language: "en".into(),
            started_at,
            total_followers: None,
        }
    }

    #[test]
    fn duration_formats_hours_and_minutes() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 13, 21, 40).unwrap();
        assert_eq!(stream(start).duration_since(now), "3hr 21 min");
    }

    #[test]
    fn duration_clamps_future_start_times() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(stream(start).duration_since(earlier), "0hr 0 min");
    }
}
