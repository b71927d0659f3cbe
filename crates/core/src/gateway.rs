//! Request/response mapping between the HTTP surface and a transcript provider.
//!
//! Every operation yields either a success payload or a [`GatewayError`] that
//! carries its own HTTP status, never both.

use thiserror::Error;

use crate::{
    error::{ProviderError, ProviderErrorKind},
    format::join_segments,
    provider::TranscriptProvider,
    types::{LanguageEntry, LanguagesResponse, TranscriptResponse},
};

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Missing {0}")]
    MissingParameter(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Provider(String),
}

impl GatewayError {
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::MissingParameter(_) => 400,
            GatewayError::Forbidden(_) => 403,
            GatewayError::NotFound(_) => 404,
            GatewayError::Provider(_) => 500,
        }
    }

    /// Classify a provider failure for the given request.
    pub fn from_provider(err: &ProviderError, request: &TranscriptRequest) -> Self {
        let video_id = &request.video_id;
        match err.kind() {
            ProviderErrorKind::NoTranscriptFound => GatewayError::NotFound(format!(
                "No transcript found for video '{}' in language '{}'",
                video_id, request.language
            )),
            ProviderErrorKind::TranscriptsDisabled => GatewayError::Forbidden(format!(
                "Transcripts are disabled for video '{}'",
                video_id
            )),
            ProviderErrorKind::VideoUnavailable => {
                GatewayError::NotFound(format!("Video '{}' is unavailable", video_id))
            }
            ProviderErrorKind::Unclassified => GatewayError::Provider(err.to_string()),
        }
    }
}

/// Validated query of either endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRequest {
    pub video_id: String,
    pub language: String,
}

impl TranscriptRequest {
    /// `video_id` must be non-empty; an omitted `language` means English.
    /// An empty `language` is passed through and matches no track.
    pub fn new(video_id: Option<&str>, language: Option<&str>) -> Result<Self, GatewayError> {
        let video_id = video_id
            .filter(|id| !id.is_empty())
            .ok_or(GatewayError::MissingParameter("video_id"))?;
        let language = language.unwrap_or(DEFAULT_LANGUAGE);

        Ok(Self {
            video_id: video_id.to_string(),
            language: language.to_string(),
        })
    }
}

/// List the transcript languages available for a video.
pub async fn list_languages(
    provider: &dyn TranscriptProvider,
    video_id: Option<&str>,
) -> Result<LanguagesResponse, GatewayError> {
    let request = TranscriptRequest::new(video_id, None)?;

    let tracks = provider
        .list(&request.video_id)
        .await
        .map_err(|e| classify(e, &request))?;

    Ok(LanguagesResponse {
        languages: tracks.iter().map(LanguageEntry::from).collect(),
        video_id: request.video_id,
    })
}

/// Fetch a transcript in one language and join its segments.
pub async fn fetch_transcript(
    provider: &dyn TranscriptProvider,
    video_id: Option<&str>,
    language: Option<&str>,
) -> Result<TranscriptResponse, GatewayError> {
    let request = TranscriptRequest::new(video_id, language)?;

    let segments = provider
        .fetch(&request.video_id, std::slice::from_ref(&request.language))
        .await
        .map_err(|e| classify(e, &request))?;

    Ok(TranscriptResponse {
        transcript: join_segments(&segments),
        total_segments: segments.len(),
        video_id: request.video_id,
        language: request.language,
    })
}

fn classify(err: ProviderError, request: &TranscriptRequest) -> GatewayError {
    let mapped = GatewayError::from_provider(&err, request);
    tracing::warn!(
        video_id = %request.video_id,
        language = %request.language,
        kind = ?err.kind(),
        status = mapped.status_code(),
        "Provider call failed: {}",
        err
    );
    mapped
}
