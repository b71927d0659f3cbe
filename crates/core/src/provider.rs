use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Segment, TranscriptTrack},
};

/// Source of caption tracks and caption text for a video.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// All tracks available for the video, in the provider's iteration order.
    async fn list(&self, video_id: &str) -> Result<Vec<TranscriptTrack>>;

    /// Segments of the first track matching one of `languages`, tried in order.
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Vec<Segment>>;
}
