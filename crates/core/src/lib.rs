//! Transcript Gateway Core Library
//!
//! Maps transcript lookups for YouTube videos onto request/response payloads,
//! and provides the YouTube transcript provider behind them.

pub mod error;
pub mod format;
pub mod gateway;
pub mod provider;
pub mod proxy;
pub mod types;
pub mod youtube;

// Re-export commonly used items at crate root
pub use error::{ProviderError, ProviderErrorKind, Result};
pub use format::join_segments;
pub use gateway::{
    DEFAULT_LANGUAGE, GatewayError, TranscriptRequest, fetch_transcript, list_languages,
};
pub use provider::TranscriptProvider;
pub use proxy::ProxyConfig;
pub use types::{
    ErrorResponse, LanguageEntry, LanguagesResponse, Segment, TranscriptResponse,
    TranscriptTrack,
};
pub use youtube::YouTubeProvider;
