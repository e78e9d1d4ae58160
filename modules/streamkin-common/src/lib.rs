pub mod config;
pub mod error;
pub mod types;
pub mod validate;

pub use config::Config;
pub use error::StreamkinError;
pub use types::{ChannelProfile, FollowerPage, LiveStream};
pub use validate::validate_login;
