//! `GET /status`: server inventory summary.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub total_images: usize,
    pub albums: usize,
    pub serve_format: String,
}

pub async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        total_images: state.library.len(),
        albums: state.library.album_count(),
        serve_format: state.serve_format.to_string(),
    })
}
