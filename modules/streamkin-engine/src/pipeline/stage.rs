//! The polymorphic stage contract and its worker loop.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::pipeline::queue::WorkQueue;

/// One pipeline phase: pull a typed item, do bounded remote work, emit zero
/// or more derived items.
///
/// `process` owns per-item error handling — a failed or empty remote result
/// is a skip recorded in the stage's [`StageStats`], never a worker exit.
/// Workers run forever; only the coordinator's cancellation ends them,
/// and only once the stage's input queue has drained.
#[async_trait]
pub trait Stage: Send + Sync + 'static {
    type In: Send + 'static;
    type Out: Send + 'static;

    fn name(&self) -> &'static str;

    async fn process(&self, item: Self::In) -> Vec<Self::Out>;

    fn stats(&self) -> &StageStats;
}

/// Per-stage success/skip tallies. Monotonic, read for display only.
#[derive(Debug, Default)]
pub struct StageStats {
    collected: AtomicU32,
    skipped: AtomicU32,
}

impl StageStats {
    pub fn add_collected(&self) {
        self.collected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn collected(&self) -> u32 {
        self.collected.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u32 {
        self.skipped.load(Ordering::Relaxed)
    }
}

/// Spawn `n_consumers` identical workers over one stage.
///
/// A worker loop is `get → process → put each output → mark_done`, with
/// `mark_done` unconditional so [`WorkQueue::join`] accounting stays exact.
/// The returned handles are aborted by the coordinator; aborting is safe at
/// the `get()` suspension point, where a worker holds no in-flight item.
pub fn spawn_workers<S: Stage>(
    stage: Arc<S>,
    q_in: Arc<WorkQueue<S::In>>,
    q_out: Option<Arc<WorkQueue<S::Out>>>,
    n_consumers: usize,
) -> Vec<JoinHandle<()>> {
    (0..n_consumers.max(1))
        .map(|worker| {
            let stage = Arc::clone(&stage);
            let q_in = Arc::clone(&q_in);
            let q_out = q_out.clone();
            tokio::spawn(async move {
                tracing::trace!(stage = stage.name(), worker, "Worker started");
                loop {
                    let item = q_in.get().await;
                    let outputs = stage.process(item).await;
                    if let Some(q) = &q_out {
                        for out in outputs {
                            q.put(out);
                        }
                    }
                    q_in.mark_done();
                }
            })
        })
        .collect()
}
