//! The three consumer stages: aggregation, liveness, enrichment.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::batcher::CandidateBatcher;
use crate::live::LiveStreamSet;
use crate::network::FollowerNetwork;
use crate::pipeline::stage::{Stage, StageStats};
use crate::traits::SocialGraph;

/// Stage 2: for each sampled follower, fetch who they follow (capped), tally
/// the followings, and forward any batch of newly-qualifying candidates the
/// batcher releases.
pub struct FollowNetStage {
    graph: Arc<dyn SocialGraph>,
    network: Arc<FollowerNetwork>,
    batcher: Arc<CandidateBatcher>,
    max_followings: usize,
    stats: StageStats,
}

impl FollowNetStage {
    pub fn new(
        graph: Arc<dyn SocialGraph>,
        network: Arc<FollowerNetwork>,
        batcher: Arc<CandidateBatcher>,
        max_followings: usize,
    ) -> Self {
        Self {
            graph,
            network,
            batcher,
            max_followings,
            stats: StageStats::default(),
        }
    }
}

#[async_trait]
impl Stage for FollowNetStage {
    type In = String;
    type Out = Vec<String>;

    fn name(&self) -> &'static str {
        "follow_net"
    }

    async fn process(&self, follower_id: String) -> Vec<Vec<String>> {
        let followings = match self
            .graph
            .capped_followings(&follower_id, self.max_followings)
            .await
        {
            Ok(f) => f,
            Err(err) => {
                debug!(follower_id = %follower_id, error = %err, "Followings fetch failed");
                Vec::new()
            }
        };

        // an over-cap or failed follower contributes nothing to the tally
        if followings.is_empty() {
            self.stats.add_skipped();
            return Vec::new();
        }

        self.network.record(&followings);
        self.stats.add_collected();
        self.batcher.poll(false)
    }

    fn stats(&self) -> &StageStats {
        &self.stats
    }
}

/// Stage 3: check which candidates in a batch are live right now and record
/// their stream attributes; live ids flow on to enrichment.
pub struct LiveStatusStage {
    graph: Arc<dyn SocialGraph>,
    live: Arc<LiveStreamSet>,
    stats: StageStats,
}

impl LiveStatusStage {
    pub fn new(graph: Arc<dyn SocialGraph>, live: Arc<LiveStreamSet>) -> Self {
        Self {
            graph,
            live,
            stats: StageStats::default(),
        }
    }
}

#[async_trait]
impl Stage for LiveStatusStage {
    type In = Vec<String>;
    type Out = String;

    fn name(&self) -> &'static str {
        "live_status"
    }

    async fn process(&self, candidate_batch: Vec<String>) -> Vec<String> {
        let streams = match self.graph.live_streams(&candidate_batch).await {
            Ok(s) => s,
            Err(err) => {
                debug!(batch_sz = candidate_batch.len(), error = %err, "Live lookup failed");
                Vec::new()
            }
        };

        let kept = self.live.update_from(streams);
        if kept.is_empty() {
            self.stats.add_skipped();
        } else {
            self.stats.add_collected();
        }
        kept
    }

    fn stats(&self) -> &StageStats {
        &self.stats
    }
}

/// Stage 4: enrich each live candidate with its total follower count — the
/// denominator the similarity ranking needs.
pub struct FollowerCountStage {
    graph: Arc<dyn SocialGraph>,
    live: Arc<LiveStreamSet>,
    stats: StageStats,
}

impl FollowerCountStage {
    pub fn new(graph: Arc<dyn SocialGraph>, live: Arc<LiveStreamSet>) -> Self {
        Self {
            graph,
            live,
            stats: StageStats::default(),
        }
    }
}

#[async_trait]
impl Stage for FollowerCountStage {
    type In = String;
    type Out = String;

    fn name(&self) -> &'static str {
        "follower_count"
    }

    async fn process(&self, live_id: String) -> Vec<String> {
        match self.graph.total_followers(&live_id).await {
            Ok(total) => {
                self.live.set_total_followers(&live_id, total);
                self.stats.add_collected();
            }
            Err(err) => {
                debug!(live_id = %live_id, error = %err, "Total-follower fetch failed");
                self.stats.add_skipped();
            }
        }
        Vec::new()
    }

    fn stats(&self) -> &StageStats {
        &self.stats
    }
}
