use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ProviderError, Result};

const CONSENT_ACTION: &str = "action=\"https://consent.youtube.com/s\"";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";

static API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap());

static CONSENT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="v" value="([^"]*)""#).unwrap());

/// What the watch page tells us to do next.
#[derive(Debug, PartialEq, Eq)]
pub enum WatchPage {
    /// EU consent interstitial; refetch with `CONSENT=YES+<token>`.
    Consent { token: String },
    Ready { api_key: String },
}

pub fn parse_watch_page(video_id: &str, html: &str) -> Result<WatchPage> {
    if html.contains(CONSENT_ACTION) {
        let token = CONSENT_TOKEN_RE
            .captures(html)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| ProviderError::ParseFailed {
                video_id: video_id.to_string(),
                reason: "consent page without a consent token".to_string(),
            })?;
        return Ok(WatchPage::Consent { token });
    }

    if html.contains(RECAPTCHA_MARKER) {
        return Err(ProviderError::IpBlocked {
            video_id: video_id.to_string(),
        });
    }

    API_KEY_RE
        .captures(html)
        .map(|caps| WatchPage::Ready {
            api_key: caps[1].to_string(),
        })
        .ok_or_else(|| ProviderError::ParseFailed {
            video_id: video_id.to_string(),
            reason: "INNERTUBE_API_KEY not found on watch page".to_string(),
        })
}

/// API key from the watch page refetched with the consent cookie.
///
/// A second consent interstitial means the cookie was rejected.
pub fn api_key_after_consent(video_id: &str, html: &str) -> Result<String> {
    match parse_watch_page(video_id, html)? {
        WatchPage::Ready { api_key } => Ok(api_key),
        WatchPage::Consent { .. } => Err(ProviderError::ParseFailed {
            video_id: video_id.to_string(),
            reason: "consent cookie was not accepted".to_string(),
        }),
    }
}
