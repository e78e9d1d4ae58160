//! Shared store of live candidate streams.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use streamkin_common::LiveStream;

/// Live streams keyed by channel id, shared between the liveness stage (which
/// inserts) and the enrichment stage (which fills in follower totals).
///
/// `base_time` is the pipeline start; stream durations are measured against
/// it so a run's output is stable however long the run takes.
pub struct LiveStreamSet {
    lang: Option<String>,
    base_time: DateTime<Utc>,
    data: Mutex<HashMap<String, LiveStream>>,
}

impl LiveStreamSet {
    /// `lang` of `None` disables the language filter.
    pub fn new(lang: Option<String>) -> Self {
        Self {
            lang,
            base_time: Utc::now(),
            data: Mutex::new(HashMap::new()),
        }
    }

    /// Insert streams that pass the language filter; returns the ids of the
    /// streams kept, which feed the enrichment queue.
    pub fn update_from(&self, streams: Vec<LiveStream>) -> Vec<String> {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        let mut kept = Vec::new();
        for stream in streams {
            if let Some(lang) = &self.lang {
                if stream.language != *lang {
                    continue;
                }
            }
            kept.push(stream.user_id.clone());
            data.insert(stream.user_id.clone(), stream);
        }
        kept
    }

    /// Fill in the follower total for one live channel. A no-op for ids that
    /// never made it into the set.
    pub fn set_total_followers(&self, user_id: &str, total: u64) {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(stream) = data.get_mut(user_id) {
            stream.total_followers = Some(total);
        }
    }

    /// Follower totals for every live channel that has been enriched.
    pub fn total_followers(&self) -> HashMap<String, u64> {
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.iter()
            .filter_map(|(id, s)| s.total_followers.map(|t| (id.clone(), t)))
            .collect()
    }

    pub fn get(&self, user_id: &str) -> Option<LiveStream> {
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.get(user_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn base_time(&self) -> DateTime<Utc> {
        self.base_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str, lang: &str) -> LiveStream {
        LiveStream {
            user_id: id.to_string(),
            user_name: format!("user_{id}"),
            title: "live".to_string(),
            viewer_count: 10,
            language: lang.to_string(),
            started_at: Utc::now(),
            total_followers: None,
        }
    }

    #[test]
    fn language_filter_drops_other_languages() {
        let set = LiveStreamSet::new(Some("en".to_string()));
        let kept = set.update_from(vec![stream("1", "en"), stream("2", "de"), stream("3", "en")]);
        assert_eq!(kept, vec!["1".to_string(), "3".to_string()]);
        assert_eq!(set.len(), 2);
        assert!(set.get("2").is_none());
    }

    #[test]
    fn no_filter_keeps_everything() {
        let set = LiveStreamSet::new(None);
        let kept = set.update_from(vec![stream("1", "en"), stream("2", "de")]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn totals_absent_until_enriched() {
        let set = LiveStreamSet::new(None);
        set.update_from(vec![stream("1", "en"), stream("2", "en")]);
        assert!(set.total_followers().is_empty());

        set.set_total_followers("1", 555);
        let totals = set.total_followers();
        assert_eq!(totals.get("1"), Some(&555));
        assert!(!totals.contains_key("2"));

        // unknown id is ignored
        set.set_total_followers("nope", 1);
        assert_eq!(set.total_followers().len(), 1);
    }
}
