//! Business logic services.

pub mod video;

pub use video::{VideoService, VideoStore};
