//! `GET /image`: serve one processed album image.
//!
//! The frame polls this endpoint on its wake cycle. The response carries
//! the processed image in the configured serve format plus an
//! `X-Thumbnail-URL` header the frame's companion UI uses to show what
//! was picked. Display dimensions come from `X-Display-Width`/
//! `X-Display-Height` request headers, defaulting to the 800x480 panel.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::Response,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::codec;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::{self, ImageEntry, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Percent-encode query values, keeping common file-name characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_');

fn header_dimension(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .filter(|&v| v > 0)
}

/// Pick the pinned image if one was requested, otherwise a random one.
fn pick_entry(state: &AppState) -> Result<ImageEntry, ApiError> {
    let pinned = state
        .pinned
        .lock()
        .expect("pinned lock poisoned")
        .take();

    match pinned {
        Some(name) => state.library.find(&name).ok_or(ApiError::ImageNotFound),
        None => state.library.random().ok_or(ApiError::NoImages),
    }
}

pub async fn handle_image(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let entry = pick_entry(&state)?;

    let width = header_dimension(&headers, "x-display-width").unwrap_or(DISPLAY_WIDTH);
    let height = header_dimension(&headers, "x-display-height").unwrap_or(DISPLAY_HEIGHT);

    let source = codec::decode_file(&entry.path)?;
    let settings = state
        .settings
        .read()
        .expect("settings lock poisoned")
        .clone();

    let canvas = services::render_for_display(
        &source,
        &settings,
        state.device_palette.as_ref(),
        width,
        height,
        state.serve_format.dithered(),
    )?;
    let bytes = codec::encode(&canvas, state.serve_format)?;

    // Warm the thumbnail cache so the advertised URL answers quickly.
    if let Err(e) = state.thumbnails.get_or_generate(&entry) {
        tracing::warn!(%e, name = %entry.name, "Thumbnail generation failed");
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let thumbnail_url = format!(
        "http://{host}/thumbnail?file={}",
        utf8_percent_encode(&entry.name, QUERY_VALUE)
    );

    tracing::info!(
        album = %entry.album,
        name = %entry.name,
        width,
        height,
        format = %state.serve_format,
        "Served image"
    );

    let response = Response::builder()
        .header(header::CONTENT_TYPE, state.serve_format.content_type())
        .header(
            "X-Thumbnail-URL",
            HeaderValue::from_str(&thumbnail_url)
                .map_err(|e| ApiError::Internal(e.to_string()))?,
        )
        .body(bytes.into())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(response)
}
