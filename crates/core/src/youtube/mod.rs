//! YouTube transcript provider.
//!
//! Resolves caption tracks through the innertube player endpoint and downloads
//! caption documents in json3 format. Every HTTP call is attempted once.

mod captions;
mod page;
mod player;

use async_trait::async_trait;
use reqwest::{
    StatusCode,
    header::{self, HeaderMap, HeaderValue},
};
use serde_json::Value;

use crate::{
    error::{ProviderError, Result},
    provider::TranscriptProvider,
    proxy::ProxyConfig,
    types::{Segment, TranscriptTrack},
};

use captions::{caption_request_url, parse_json3};
use page::{WatchPage, api_key_after_consent, parse_watch_page};
use player::{check_playability, parse_caption_tracks, player_request_body, select_track};

const WATCH_URL: &str = "https://www.youtube.com/watch";
const INNERTUBE_PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";

pub struct YouTubeProvider {
    client: reqwest::Client,
    proxy: ProxyConfig,
}

impl YouTubeProvider {
    pub fn new(proxy: ProxyConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));
        if proxy.is_proxied() {
            // Exit IP rotates per connection
            headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(p) = proxy.to_reqwest()? {
            builder = builder.proxy(p);
        }

        Ok(Self {
            client: builder.build()?,
            proxy,
        })
    }

    pub fn proxy(&self) -> &ProxyConfig {
        &self.proxy
    }

    async fn fetch_watch_page(&self, video_id: &str, consent: Option<&str>) -> Result<String> {
        let mut request = self.client.get(WATCH_URL).query(&[("v", video_id)]);
        if let Some(token) = consent {
            request = request.header(header::COOKIE, format!("CONSENT=YES+{}", token));
        }

        tracing::debug!(video_id, consent = consent.is_some(), "GET watch page");
        let response = check_status(video_id, request.send().await?)?;
        Ok(response.text().await?)
    }

    async fn fetch_api_key(&self, video_id: &str) -> Result<String> {
        let html = self.fetch_watch_page(video_id, None).await?;
        let token = match parse_watch_page(video_id, &html)? {
            WatchPage::Ready { api_key } => return Ok(api_key),
            WatchPage::Consent { token } => token,
        };

        let html = self.fetch_watch_page(video_id, Some(&token)).await?;
        api_key_after_consent(video_id, &html)
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<Value> {
        tracing::debug!(video_id, "POST innertube player");
        let response = self
            .client
            .post(INNERTUBE_PLAYER_URL)
            .query(&[("key", api_key)])
            .json(&player_request_body(video_id))
            .send()
            .await?;

        Ok(check_status(video_id, response)?.json::<Value>().await?)
    }

    async fn fetch_tracks(&self, video_id: &str) -> Result<Vec<TranscriptTrack>> {
        if video_id.starts_with("http://") || video_id.starts_with("https://") {
            return Err(ProviderError::InvalidVideoId {
                video_id: video_id.to_string(),
            });
        }

        let api_key = self.fetch_api_key(video_id).await?;
        let player = self.fetch_player(video_id, &api_key).await?;
        check_playability(video_id, &player)?;
        let tracks = parse_caption_tracks(video_id, &player)?;

        tracing::debug!(video_id, tracks = tracks.len(), "Resolved caption tracks");
        Ok(tracks)
    }

    async fn fetch_captions(
        &self,
        video_id: &str,
        track: &TranscriptTrack,
    ) -> Result<Vec<Segment>> {
        let url = caption_request_url(video_id, track)?;

        tracing::debug!(
            video_id,
            language = %track.language_code,
            generated = track.is_generated,
            "GET caption track"
        );
        let response = self.client.get(url).send().await?;
        let body = check_status(video_id, response)?.text().await?;

        Ok(parse_json3(&body)?)
    }
}

#[async_trait]
impl TranscriptProvider for YouTubeProvider {
    async fn list(&self, video_id: &str) -> Result<Vec<TranscriptTrack>> {
        self.fetch_tracks(video_id).await
    }

    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Vec<Segment>> {
        let tracks = self.fetch_tracks(video_id).await?;
        let track = select_track(video_id, &tracks, languages)?;
        self.fetch_captions(video_id, track).await
    }
}

fn check_status(video_id: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RequestBlocked {
            video_id: video_id.to_string(),
        });
    }
    Ok(response.error_for_status()?)
}
