//! Follower sampling — the upstream-most producer.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::pipeline::queue::WorkQueue;
use crate::traits::SocialGraph;

/// Walks the origin channel's follower pages, pushing follower ids onto the
/// first inter-stage queue until `sample_sz` ids are collected or the cursor
/// runs out.
///
/// Unlike the consumer stages this is a single task that terminates on its
/// own — its input (the follower sample) is bounded, so the coordinator just
/// awaits it before starting the drain protocol.
pub struct FollowerSampler {
    graph: Arc<dyn SocialGraph>,
    channel_id: String,
    sample_sz: usize,
}

/// What the sampler learned while producing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSummary {
    /// Follower ids actually pushed downstream (≤ `sample_sz`).
    pub num_sampled: usize,
    /// Channel-wide follower total reported by the first page.
    pub channel_total: u64,
}

impl FollowerSampler {
    pub fn new(graph: Arc<dyn SocialGraph>, channel_id: impl Into<String>, sample_sz: usize) -> Self {
        Self {
            graph,
            channel_id: channel_id.into(),
            sample_sz,
        }
    }

    /// Fetch follower pages and enqueue each follower id as it arrives, so
    /// downstream workers start before sampling finishes.
    pub async fn produce(&self, q_out: &WorkQueue<String>) -> Result<SampleSummary> {
        let mut summary = SampleSummary::default();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .graph
                .follower_page(&self.channel_id, self.sample_sz, cursor.as_deref())
                .await
                .context("failed to fetch follower page")?;

            if summary.channel_total == 0 {
                summary.channel_total = page.total;
            }

            for follower_id in &page.follower_ids {
                if summary.num_sampled >= self.sample_sz {
                    break;
                }
                q_out.put(follower_id.clone());
                summary.num_sampled += 1;
            }

            cursor = page.cursor;
            let exhausted = page.follower_ids.is_empty() || cursor.is_none();
            if summary.num_sampled >= self.sample_sz || exhausted {
                break;
            }
        }

        debug!(
            channel_id = %self.channel_id,
            sampled = summary.num_sampled,
            total = summary.channel_total,
            "Follower sample complete"
        );
        Ok(summary)
    }
}
