//! Innertube player response handling: playability and caption tracks.

use serde_json::{Value, json};

use crate::{
    error::{ProviderError, Result},
    types::TranscriptTrack,
};

const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

pub fn player_request_body(video_id: &str) -> Value {
    json!({
        "context": {
            "client": {
                "clientName": CLIENT_NAME,
                "clientVersion": CLIENT_VERSION,
            }
        },
        "videoId": video_id,
    })
}

/// Map a non-OK `playabilityStatus` to a provider error.
pub fn check_playability(video_id: &str, player: &Value) -> Result<()> {
    let status = &player["playabilityStatus"];
    let Some(code) = status["status"].as_str() else {
        return Ok(());
    };
    if code == "OK" {
        return Ok(());
    }

    let reason = status["reason"].as_str().unwrap_or_default();
    let video_id = video_id.to_string();

    match code {
        "LOGIN_REQUIRED" if reason.contains("not a bot") => {
            Err(ProviderError::RequestBlocked { video_id })
        }
        "LOGIN_REQUIRED" if is_age_restriction(reason) => {
            Err(ProviderError::AgeRestricted { video_id })
        }
        "ERROR" if reason == "This video is unavailable" => {
            Err(ProviderError::VideoUnavailable { video_id })
        }
        _ => {
            let subreasons = status["errorScreen"]["playerErrorMessageRenderer"]["subreason"]
                ["runs"]
                .as_array()
                .map(|runs| {
                    runs.iter()
                        .filter_map(|run| run["text"].as_str())
                        .collect::<String>()
                })
                .unwrap_or_default();
            let reason = if subreasons.is_empty() {
                reason.to_string()
            } else if reason.is_empty() {
                subreasons
            } else {
                format!("{} ({})", reason, subreasons)
            };
            Err(ProviderError::VideoUnplayable { video_id, reason })
        }
    }
}

fn is_age_restriction(reason: &str) -> bool {
    reason.contains("inappropriate") || reason.contains("confirm your age")
}

/// Caption tracks of a playable video: manually created first, then generated.
pub fn parse_caption_tracks(video_id: &str, player: &Value) -> Result<Vec<TranscriptTrack>> {
    let captions = player["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"]
        .as_array()
        .ok_or_else(|| ProviderError::TranscriptsDisabled {
            video_id: video_id.to_string(),
        })?;

    let mut manual = Vec::new();
    let mut generated = Vec::new();

    for caption in captions {
        let (Some(language_code), Some(base_url)) =
            (caption["languageCode"].as_str(), caption["baseUrl"].as_str())
        else {
            continue;
        };

        let language = caption["name"]["runs"][0]["text"]
            .as_str()
            .or_else(|| caption["name"]["simpleText"].as_str())
            .unwrap_or(language_code)
            .to_string();
        let is_generated = caption["kind"].as_str() == Some("asr");

        let track = TranscriptTrack {
            language_code: language_code.to_string(),
            language,
            is_generated,
            is_translatable: caption["isTranslatable"].as_bool().unwrap_or(false),
            base_url: base_url.to_string(),
        };

        if is_generated {
            generated.push(track);
        } else {
            manual.push(track);
        }
    }

    manual.extend(generated);
    Ok(manual)
}

/// First track matching a requested language, preferring manual over generated.
pub fn select_track<'a>(
    video_id: &str,
    tracks: &'a [TranscriptTrack],
    languages: &[String],
) -> Result<&'a TranscriptTrack> {
    for language in languages {
        let mut candidates = tracks.iter().filter(|t| &t.language_code == language);
        let manual = candidates.clone().find(|t| !t.is_generated);
        if let Some(track) = manual.or_else(|| candidates.next()) {
            return Ok(track);
        }
    }

    Err(ProviderError::NoTranscriptFound {
        video_id: video_id.to_string(),
        requested: languages.to_vec(),
        available: tracks.iter().map(|t| t.language_code.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn player_with_tracks(tracks: Value) -> Value {
        json!({
            "playabilityStatus": { "status": "OK" },
            "captions": {
                "playerCaptionsTracklistRenderer": { "captionTracks": tracks }
            }
        })
    }

    fn track(code: &str, generated: bool) -> TranscriptTrack {
        TranscriptTrack {
            language_code: code.to_string(),
            language: code.to_uppercase(),
            is_generated: generated,
            is_translatable: false,
            base_url: format!("https://example.test/{}/{}", code, generated),
        }
    }

    #[test]
    fn request_body_uses_android_client() {
        let body = player_request_body("abc");
        assert_eq!(body["videoId"], "abc");
        assert_eq!(body["context"]["client"]["clientName"], "ANDROID");
    }

    #[test]
    fn ok_and_missing_status_are_playable() {
        assert!(check_playability("abc", &json!({"playabilityStatus": {"status": "OK"}})).is_ok());
        assert!(check_playability("abc", &json!({})).is_ok());
    }

    #[rstest]
    #[case("LOGIN_REQUIRED", "Sign in to confirm you’re not a bot", "RequestBlocked")]
    #[case(
        "LOGIN_REQUIRED",
        "This video may be inappropriate for some users.",
        "AgeRestricted"
    )]
    #[case("ERROR", "This video is unavailable", "VideoUnavailable")]
    #[case("UNPLAYABLE", "Video unavailable", "VideoUnplayable")]
    fn playability_failures_are_classified(
        #[case] status: &str,
        #[case] reason: &str,
        #[case] expected: &str,
    ) {
        let player = json!({"playabilityStatus": {"status": status, "reason": reason}});
        let err = check_playability("abc", &player).unwrap_err();
        let actual = match err {
            ProviderError::RequestBlocked { .. } => "RequestBlocked",
            ProviderError::AgeRestricted { .. } => "AgeRestricted",
            ProviderError::VideoUnavailable { .. } => "VideoUnavailable",
            ProviderError::VideoUnplayable { .. } => "VideoUnplayable",
            other => panic!("unexpected error: {other}"),
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn unplayable_reason_includes_subreason() {
        let player = json!({
            "playabilityStatus": {
                "status": "UNPLAYABLE",
                "reason": "Private video",
                "errorScreen": {
                    "playerErrorMessageRenderer": {
                        "subreason": {
                            "runs": [
                                {"text": "Sign in "},
                                {"text": "if you've been granted access"}
                            ]
                        }
                    }
                }
            }
        });
        let err = check_playability("abc", &player).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The video 'abc' is unplayable: Private video (Sign in if you've been granted access)"
        );
    }

    #[test]
    fn missing_captions_means_disabled() {
        let player = json!({"playabilityStatus": {"status": "OK"}});
        let err = parse_caption_tracks("abc", &player).unwrap_err();
        assert!(matches!(err, ProviderError::TranscriptsDisabled { .. }));
    }

    #[test]
    fn manual_tracks_come_before_generated() {
        let player = player_with_tracks(json!([
            {
                "baseUrl": "https://yt/asr",
                "name": {"runs": [{"text": "English (auto-generated)"}]},
                "languageCode": "en",
                "kind": "asr",
                "isTranslatable": true
            },
            {"baseUrl": "https://yt/de", "name": {"simpleText": "German"}, "languageCode": "de"},
            {
                "baseUrl": "https://yt/es",
                "name": {"runs": [{"text": "Spanish"}]},
                "languageCode": "es",
                "isTranslatable": true
            },
        ]));

        let tracks = parse_caption_tracks("abc", &player).unwrap();
        let codes: Vec<_> = tracks
            .iter()
            .map(|t| (t.language_code.as_str(), t.language.as_str(), t.is_generated))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("de", "German", false),
                ("es", "Spanish", false),
                ("en", "English (auto-generated)", true),
            ]
        );
        assert_eq!(tracks[2].base_url, "https://yt/asr");
        assert!(tracks[1].is_translatable);
    }

    #[test]
    fn selection_prefers_manual_track() {
        let tracks = vec![track("en", true), track("en", false)];
        let selected = select_track("abc", &tracks, &["en".to_string()]).unwrap();
        assert!(!selected.is_generated);
    }

    #[test]
    fn selection_follows_requested_order() {
        let tracks = vec![track("de", false), track("en", true)];
        let languages = vec!["fr".to_string(), "en".to_string(), "de".to_string()];
        let selected = select_track("abc", &tracks, &languages).unwrap();
        assert_eq!(selected.language_code, "en");
    }

    #[test]
    fn empty_language_matches_no_track() {
        let tracks = vec![track("en", false)];
        let err = select_track("abc", &tracks, &[String::new()]).unwrap_err();
        assert!(matches!(err, ProviderError::NoTranscriptFound { .. }));
    }

    #[test]
    fn selection_reports_available_languages() {
        let tracks = vec![track("de", false), track("en", true)];
        let err = select_track("abc", &tracks, &["zz".to_string()]).unwrap_err();
        match err {
            ProviderError::NoTranscriptFound {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, vec!["zz"]);
                assert_eq!(available, vec!["de", "en"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
