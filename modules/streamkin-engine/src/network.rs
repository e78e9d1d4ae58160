//! Follower-network tally: who do the sampled followers also follow?

use std::collections::HashMap;
use std::sync::Mutex;

/// Counts, per candidate channel, how many observed followings point at it.
///
/// Many aggregation workers call [`record`](Self::record) concurrently; the
/// map is mutex-guarded so N concurrent increments of one id always land as
/// exactly N. Counts only grow during a run.
///
/// The origin channel's own id is excluded from every view — the channel a
/// follower already follows is not a recommendation.
pub struct FollowerNetwork {
    origin_id: String,
    min_mutual: u32,
    counts: Mutex<HashMap<String, u32>>,
}

impl FollowerNetwork {
    pub fn new(origin_id: impl Into<String>, min_mutual: u32) -> Self {
        Self {
            origin_id: origin_id.into(),
            min_mutual,
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Tally one follower's followings. Each appearance counts once, so a
    /// duplicated id within the slice increments twice (plain tally, not a
    /// per-follower indicator).
    pub fn record(&self, followed_ids: &[String]) {
        let mut counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        for id in followed_ids {
            *counts.entry(id.clone()).or_insert(0) += 1;
        }
    }

    /// Candidates followed by at least `min_mutual` distinct sampled
    /// followers. The origin id never appears, whatever its count.
    pub fn mutual_followings(&self) -> HashMap<String, u32> {
        let counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        counts
            .iter()
            .filter(|(id, count)| **count >= self.min_mutual && **id != self.origin_id)
            .map(|(id, count)| (id.clone(), *count))
            .collect()
    }

    /// Number of distinct candidates observed so far (origin excluded).
    pub fn len(&self) -> usize {
        let counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        counts.keys().filter(|id| **id != self.origin_id).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn record_tallies_every_appearance() {
        let net = FollowerNetwork::new("origin", 2);
        net.record(&ids(&["a", "b"]));
        net.record(&ids(&["a", "a"])); // duplicate within one call counts twice
        net.record(&ids(&["b"]));

        let mutual = net.mutual_followings();
        assert_eq!(mutual.get("a"), Some(&3));
        assert_eq!(mutual.get("b"), Some(&2));
    }

    #[test]
    fn below_threshold_candidates_are_filtered() {
        let net = FollowerNetwork::new("origin", 3);
        net.record(&ids(&["a", "b"]));
        net.record(&ids(&["a"]));
        net.record(&ids(&["a"]));

        let mutual = net.mutual_followings();
        assert_eq!(mutual.len(), 1);
        assert!(mutual.contains_key("a"));
    }

    #[test]
    fn origin_is_always_excluded() {
        let net = FollowerNetwork::new("origin", 1);
        net.record(&ids(&["origin", "origin", "a"]));
        let mutual = net.mutual_followings();
        assert!(!mutual.contains_key("origin"));
        assert!(mutual.contains_key("a"));
        assert_eq!(net.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_records_neither_drop_nor_double_count() {
        let net = Arc::new(FollowerNetwork::new("origin", 1));
        let mut handles = Vec::new();
        for _ in 0..50 {
            let net = net.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..20 {
                    net.record(&["x".to_string()]);
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(net.mutual_followings().get("x"), Some(&1000));
    }
}
