use serde::Deserialize;

use crate::{
    error::{ProviderError, Result},
    types::{Segment, TranscriptTrack},
};

const CAPTION_FORMAT: &str = "fmt=json3";

/// Marker YouTube puts in caption URLs that only resolve with a PO token.
const PO_TOKEN_MARKER: &str = "&exp=xpe";

#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    a_append: u8,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Rewrite a track's base URL to request the json3 caption format.
pub fn caption_url(base_url: &str) -> String {
    let Some((path, query)) = base_url.split_once('?') else {
        return format!("{}?{}", base_url, CAPTION_FORMAT);
    };

    let mut params: Vec<&str> = query
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with("fmt="))
        .collect();
    params.push(CAPTION_FORMAT);

    format!("{}?{}", path, params.join("&"))
}

/// URL to download a track from, unless the track needs a PO token.
pub fn caption_request_url(video_id: &str, track: &TranscriptTrack) -> Result<String> {
    if track.base_url.contains(PO_TOKEN_MARKER) {
        return Err(ProviderError::PoTokenRequired {
            video_id: video_id.to_string(),
        });
    }
    Ok(caption_url(&track.base_url))
}

/// Parse a json3 caption document into segments, in document order.
pub fn parse_json3(body: &str) -> serde_json::Result<Vec<Segment>> {
    let document: Json3Document = serde_json::from_str(body)?;

    let segments = document
        .events
        .into_iter()
        .filter(|event| event.a_append == 0)
        .filter_map(|event| {
            let text: String = event.segs?.into_iter().map(|seg| seg.utf8).collect();
            if text.is_empty() {
                return None;
            }
            Some(Segment {
                start: event.t_start_ms as f64 / 1000.0,
                end: (event.t_start_ms + event.d_duration_ms) as f64 / 1000.0,
                text,
            })
        })
        .collect();

    Ok(segments)
}
