//! Pipeline wiring and the drain/flush/cancel shutdown protocol.

use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::info;

use crate::batcher::CandidateBatcher;
use crate::live::LiveStreamSet;
use crate::network::FollowerNetwork;
use crate::pipeline::queue::WorkQueue;
use crate::pipeline::run_log::RunLog;
use crate::pipeline::sampler::FollowerSampler;
use crate::pipeline::stage::{spawn_workers, Stage};
use crate::pipeline::stages::{FollowNetStage, FollowerCountStage, LiveStatusStage};
use crate::pipeline::stats::PipelineStats;
use crate::traits::SocialGraph;

/// Pipeline knobs. Defaults match a medium-sized channel scan.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Follower sample size.
    pub sample_sz: usize,
    /// Per-follower cap on followings fetched.
    pub max_followings: usize,
    /// Candidates must be followed by at least this many sampled followers.
    pub min_mutual: u32,
    /// Candidate batch size for the liveness lookup.
    pub batch_sz: usize,
    /// Worker pool size for the aggregation stage; enrichment runs half.
    pub n_consumers: usize,
    /// Keep only live streams in this language; `None` keeps all.
    pub lang: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_sz: 300,
            max_followings: 150,
            min_mutual: 3,
            batch_sz: 100,
            n_consumers: 100,
            lang: Some("en".to_string()),
        }
    }
}

/// Wires the stages together and owns shutdown.
///
/// Workers never terminate on their own — the queues carry no end-of-stream
/// marker — so completion is inferred per stage, in pipeline order:
/// join the stage's input queue, flush anything the stage withheld onto the
/// next queue, and only then cancel its workers. Flushing stage k before
/// joining stage k+1 matters: the flushed remainder is new input for k+1,
/// and joining k+1 early races against it.
pub struct RecommendationPipeline {
    graph: Arc<dyn SocialGraph>,
    network: Arc<FollowerNetwork>,
    batcher: Arc<CandidateBatcher>,
    live: Arc<LiveStreamSet>,
    origin_id: String,
    config: PipelineConfig,
    run_log: RunLog,
}

impl RecommendationPipeline {
    pub fn new(
        graph: Arc<dyn SocialGraph>,
        network: Arc<FollowerNetwork>,
        batcher: Arc<CandidateBatcher>,
        live: Arc<LiveStreamSet>,
        origin_id: impl Into<String>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            graph,
            network,
            batcher,
            live,
            origin_id: origin_id.into(),
            config,
            run_log: RunLog::new(),
        }
    }

    /// Milestone log of the drain protocol; populated by [`run`](Self::run).
    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    /// Execute the full pipeline and return run stats.
    pub async fn run(&self) -> Result<PipelineStats> {
        let q_followers: Arc<WorkQueue<String>> = Arc::new(WorkQueue::new());
        let q_candidates: Arc<WorkQueue<Vec<String>>> = Arc::new(WorkQueue::new());
        let q_live: Arc<WorkQueue<String>> = Arc::new(WorkQueue::new());

        let follow_net = Arc::new(FollowNetStage::new(
            Arc::clone(&self.graph),
            Arc::clone(&self.network),
            Arc::clone(&self.batcher),
            self.config.max_followings,
        ));
        let live_status = Arc::new(LiveStatusStage::new(
            Arc::clone(&self.graph),
            Arc::clone(&self.live),
        ));
        let follower_count = Arc::new(FollowerCountStage::new(
            Arc::clone(&self.graph),
            Arc::clone(&self.live),
        ));

        let t_follow_net = spawn_workers(
            Arc::clone(&follow_net),
            Arc::clone(&q_followers),
            Some(Arc::clone(&q_candidates)),
            self.config.n_consumers,
        );
        // one liveness worker: each item is already a whole batch
        let t_live_status = spawn_workers(
            Arc::clone(&live_status),
            Arc::clone(&q_candidates),
            Some(Arc::clone(&q_live)),
            1,
        );
        let t_follower_count = spawn_workers(
            Arc::clone(&follower_count),
            Arc::clone(&q_live),
            None,
            (self.config.n_consumers / 2).max(1),
        );

        let all_handles = || {
            t_follow_net
                .iter()
                .chain(&t_live_status)
                .chain(&t_follower_count)
        };

        // stage 1: the bounded producer runs to completion on its own
        let sampler = FollowerSampler::new(
            Arc::clone(&self.graph),
            self.origin_id.clone(),
            self.config.sample_sz,
        );
        self.run_log.mark("sampler.started");
        let sample = match sampler.produce(&q_followers).await {
            Ok(s) => s,
            Err(err) => {
                abort_all(all_handles());
                return Err(err);
            }
        };
        self.run_log.mark("sampler.finished");

        // stage 2: drain, flush the withheld remainder downstream, cancel
        q_followers.join().await;
        self.run_log.mark("followers.drained");
        for batch in self.batcher.poll(true) {
            q_candidates.put(batch);
        }
        self.run_log.mark("candidates.flushed");
        abort_all(t_follow_net.iter());
        self.run_log.mark("follow_net.cancelled");

        // stage 3
        q_candidates.join().await;
        self.run_log.mark("candidates.drained");
        abort_all(t_live_status.iter());
        self.run_log.mark("live_status.cancelled");

        // stage 4
        q_live.join().await;
        self.run_log.mark("live.drained");
        abort_all(t_follower_count.iter());
        self.run_log.mark("follower_count.cancelled");

        let stats = PipelineStats {
            followers_sampled: sample.num_sampled,
            channel_total_followers: sample.channel_total,
            followings_kept: follow_net.stats().collected(),
            followings_skipped: follow_net.stats().skipped(),
            candidates_observed: self.network.len(),
            mutual_candidates: self.network.mutual_followings().len(),
            ids_emitted: self.batcher.emitted(),
            live_batches_hit: live_status.stats().collected(),
            live_batches_missed: live_status.stats().skipped(),
            live_found: self.live.len(),
            enriched: follower_count.stats().collected(),
            enrich_failed: follower_count.stats().skipped(),
        };
        info!(
            mutual = stats.mutual_candidates,
            live = stats.live_found,
            "Pipeline drained"
        );
        Ok(stats)
    }
}

fn abort_all<'a>(handles: impl Iterator<Item = &'a JoinHandle<()>>) {
    for handle in handles {
        handle.abort();
    }
}
