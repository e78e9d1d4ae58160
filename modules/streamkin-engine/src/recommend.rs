//! Top-level entry: resolve a channel, run the pipeline, rank the results.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, Instrument};
use uuid::Uuid;

use streamkin_common::{validate_login, ChannelProfile, LiveStream, StreamkinError};

use crate::batcher::CandidateBatcher;
use crate::live::LiveStreamSet;
use crate::network::FollowerNetwork;
use crate::pipeline::{PipelineConfig, PipelineStats, RecommendationPipeline};
use crate::similarity;
use crate::traits::SocialGraph;

/// One ranked recommendation: a live channel plus how it scored.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Recommendation {
    pub channel_id: String,
    pub stream: LiveStream,
    pub score: f64,
    pub overlap: u32,
    pub duration: String,
}

/// Everything a caller gets back from a run.
#[derive(Debug)]
pub struct RunOutcome {
    pub origin: ChannelProfile,
    pub recommendations: Vec<Recommendation>,
    pub stats: PipelineStats,
}

pub struct Recommender {
    graph: Arc<dyn SocialGraph>,
    config: PipelineConfig,
}

impl Recommender {
    pub fn new(graph: Arc<dyn SocialGraph>, config: PipelineConfig) -> Self {
        Self { graph, config }
    }

    /// Validate the login, resolve the channel, run the pipeline, and return
    /// live candidates ranked by audience-overlap score.
    ///
    /// Validation and resolution failures are fatal and happen before any
    /// stage worker starts.
    pub async fn run(&self, raw_login: &str) -> Result<RunOutcome> {
        let login = validate_login(raw_login)?;
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("recommendation_run", %run_id, login = %login);
        self.run_resolved(&login).instrument(span).await
    }

    async fn run_resolved(&self, login: &str) -> Result<RunOutcome> {
        let mut origin = self
            .graph
            .resolve_channel(login)
            .await?
            .ok_or_else(|| {
                StreamkinError::Resolution(format!("no channel found for login \"{login}\""))
            })?;
        info!(channel_id = %origin.id, "Channel resolved");

        let network = Arc::new(FollowerNetwork::new(&origin.id, self.config.min_mutual));
        let batcher = Arc::new(CandidateBatcher::new(
            Arc::clone(&network),
            self.config.batch_sz,
        ));
        let live = Arc::new(LiveStreamSet::new(self.config.lang.clone()));

        let pipeline = RecommendationPipeline::new(
            Arc::clone(&self.graph),
            Arc::clone(&network),
            Arc::clone(&batcher),
            Arc::clone(&live),
            origin.id.clone(),
            self.config.clone(),
        );
        let stats = pipeline.run().await?;
        origin.total_followers = Some(stats.channel_total_followers);

        let mutual = network.mutual_followings();
        let totals = live.total_followers();
        let scores = similarity::jaccard_scores(&mutual, &totals, stats.followings_kept);

        let base_time = live.base_time();
        let recommendations = similarity::rank(&scores)
            .into_iter()
            .filter_map(|(id, score)| {
                // rank covers every mutual candidate; only live ones are
                // worth recommending
                live.get(&id).map(|stream| Recommendation {
                    duration: stream.duration_since(base_time),
                    overlap: mutual.get(&id).copied().unwrap_or(0),
                    channel_id: id,
                    stream,
                    score,
                })
            })
            .collect();

        Ok(RunOutcome {
            origin,
            recommendations,
            stats,
        })
    }
}
