pub mod coordinator;
pub mod queue;
pub mod run_log;
pub mod sampler;
pub mod stage;
pub mod stages;
pub mod stats;


pub use coordinator::{PipelineConfig, RecommendationPipeline};
pub use queue::WorkQueue;
pub use run_log::RunLog;
pub use sampler::{FollowerSampler, SampleSummary};
pub use stage::{spawn_workers, Stage, StageStats};
pub use stats::PipelineStats;
