pub mod batcher;
pub mod live;
pub mod network;
pub mod pipeline;
pub mod recommend;
pub mod similarity;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use batcher::CandidateBatcher;
pub use live::LiveStreamSet;
pub use network::FollowerNetwork;
pub use recommend::{Recommendation, Recommender};
pub use traits::SocialGraph;
