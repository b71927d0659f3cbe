use std::{sync::Arc, time::Instant};

use axum::{
    Json, Router,
    extract::{Query, Request, State, rejection::QueryRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::Instrument;
use transcript_gateway_core::{
    ErrorResponse, GatewayError, LanguagesResponse, TranscriptProvider, TranscriptResponse,
    fetch_transcript, list_languages,
};
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub type SharedProvider = Arc<dyn TranscriptProvider>;

#[derive(Clone)]
struct AppState {
    provider: SharedProvider,
}

pub fn router(provider: SharedProvider) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/languages", get(languages))
        .route("/transcript", get(transcript))
        .layer(middleware::from_fn(trace_request))
        .with_state(AppState { provider })
}

/// Raw query pairs in request order; repeated keys are kept.
type QueryPairs = Vec<(String, String)>;

/// First value of `key`, as a form handler would read it.
fn first_param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// JSON error body with the status the gateway assigned.
pub enum ApiError {
    Gateway(GatewayError),
    BadQuery(QueryRejection),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Gateway(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadQuery(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Gateway(err) => (
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.to_string(),
            ),
            ApiError::BadQuery(rejection) => (rejection.status(), rejection.body_text()),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn languages(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<LanguagesResponse>, ApiError> {
    let Query(pairs) = query?;
    let video_id = first_param(&pairs, "video_id");
    let response = list_languages(state.provider.as_ref(), video_id).await?;

    tracing::debug!(
        video_id = %response.video_id,
        languages = response.languages.len(),
        "Listed transcript languages"
    );
    Ok(Json(response))
}

async fn transcript(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let Query(pairs) = query?;
    let response = fetch_transcript(
        state.provider.as_ref(),
        first_param(&pairs, "video_id"),
        first_param(&pairs, "lang"),
    )
    .await?;

    tracing::debug!(
        video_id = %response.video_id,
        language = %response.language,
        segments = response.total_segments,
        "Fetched transcript"
    );
    Ok(Json(response))
}

async fn trace_request(request: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let started = Instant::now();
        let response = next.run(request).await;
        tracing::info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await
}
