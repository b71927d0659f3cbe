use thiserror::Error;

/// Failures reported by a transcript provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No transcript for video '{video_id}' in {requested:?}; available: {available:?}")]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("Subtitles are disabled for video '{video_id}'")]
    TranscriptsDisabled { video_id: String },

    #[error("The video '{video_id}' is no longer available")]
    VideoUnavailable { video_id: String },

    #[error("The video '{video_id}' is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("The video '{video_id}' is age restricted and requires authentication")]
    AgeRestricted { video_id: String },

    #[error("YouTube is blocking requests for video '{video_id}' from this IP address")]
    RequestBlocked { video_id: String },

    #[error("YouTube requires a captcha for video '{video_id}'; this IP address has been blocked")]
    IpBlocked { video_id: String },

    #[error("'{video_id}' looks like a URL; pass the video id instead")]
    InvalidVideoId { video_id: String },

    #[error("Caption track for video '{video_id}' requires a PO token")]
    PoTokenRequired { video_id: String },

    #[error("Failed to parse YouTube response for video '{video_id}': {reason}")]
    ParseFailed { video_id: String, reason: String },

    #[error("YouTube request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Classification the gateway maps onto HTTP outcomes.
///
/// Anything without a dedicated outcome is `Unclassified`, so new provider
/// failures need no gateway change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    NoTranscriptFound,
    TranscriptsDisabled,
    VideoUnavailable,
    Unclassified,
}

impl ProviderError {
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::NoTranscriptFound { .. } => ProviderErrorKind::NoTranscriptFound,
            ProviderError::TranscriptsDisabled { .. } => ProviderErrorKind::TranscriptsDisabled,
            ProviderError::VideoUnavailable { .. } => ProviderErrorKind::VideoUnavailable,
            _ => ProviderErrorKind::Unclassified,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
