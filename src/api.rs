//! HTTP API endpoints for inspecting loaded streamer data.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::config::validate_streamer;
use crate::loader::expected_paths;
use crate::state::AppState;

/// Size of a streamer's loaded data
#[derive(Debug, Clone, Serialize)]
pub struct StreamerStats {
    pub streamer: String,
    pub real_messages: usize,
    pub ai_messages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub streamer: String,
    pub error: String,
    pub expected: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadedStreamers {
    pub streamers: Vec<String>,
}

/// List streamers whose data is currently loaded.
///
/// GET /api/streamers
pub async fn list_streamers(State(state): State<Arc<AppState>>) -> Json<LoadedStreamers> {
    Json(LoadedStreamers {
        streamers: state.loaded_streamers().await,
    })
}

/// Load (if needed) and describe a streamer's data.
///
/// GET /api/streamers/{name}
pub async fn streamer_stats(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let streamer = match validate_streamer(&name) {
        Ok(s) => s,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.get_corpus(streamer).await {
        Ok(corpus) => Json(StreamerStats {
            streamer: corpus.streamer.clone(),
            real_messages: corpus.real.len(),
            ai_messages: corpus.ai.len(),
        })
        .into_response(),
        Err(e) => {
            tracing::warn!("Stats request for {} failed: {}", streamer, e);
            (
                StatusCode::NOT_FOUND,
                Json(LoadFailure {
                    streamer: streamer.to_string(),
                    error: e.to_string(),
                    expected: expected_paths(streamer),
                }),
            )
                .into_response()
        }
    }
}
