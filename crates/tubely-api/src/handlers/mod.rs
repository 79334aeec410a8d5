//! HTTP handlers.

pub mod health;
pub mod upload_thumbnail;
pub mod upload_video;
pub mod videos;

pub use health::{health, ready};
pub use upload_thumbnail::upload_thumbnail;
pub use upload_video::upload_video;
pub use videos::{get_video, VideoResponse};
