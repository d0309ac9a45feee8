//! `GET /thumbnail?file=<name>`: serve a source-image thumbnail.
//!
//! Thumbnails show the unprocessed photo (never the dither pattern) and
//! are cached after first generation.

use axum::{
    extract::{Query, State},
    http::header,
    response::Response,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct ThumbnailQuery {
    file: Option<String>,
}

pub async fn handle_thumbnail(
    State(state): State<AppState>,
    Query(query): Query<ThumbnailQuery>,
) -> Result<Response, ApiError> {
    let name = query.file.ok_or(ApiError::MissingParameter("file"))?;

    let entry = state.library.find(&name).ok_or(ApiError::ImageNotFound)?;
    let bytes = state.thumbnails.get_or_generate(&entry)?;

    tracing::debug!(name = %entry.name, album = %entry.album, "Served thumbnail");

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "image/jpeg")
        .body(bytes.into())
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(response)
}
