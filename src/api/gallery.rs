//! Gallery management API backing the web UI.
//!
//! - `GET  /api/images`  - list all images
//! - `POST /api/upload`  - multipart upload into the uploads album
//! - `POST /api/delete`  - delete by file name
//! - `POST /api/display` - pin a file for the next `/image` poll
//! - `GET/POST /api/config` - read or replace processing settings

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::codec;
use crate::error::ApiError;
use crate::models::ProcessingSettings;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct ImageInfo {
    pub name: String,
    pub album: String,
}

pub async fn handle_list_images(State(state): State<AppState>) -> Json<Vec<ImageInfo>> {
    let images = state
        .library
        .all()
        .into_iter()
        .map(|e| ImageInfo {
            name: e.name,
            album: e.album,
        })
        .collect();
    Json(images)
}

pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut stored: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        // The web UI posts `image` plus a client-side `thumbnail` field;
        // only the image is stored, thumbnails are generated server-side.
        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| ApiError::BadRequest("image field needs a filename".to_string()))?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        // Refuse files the pipeline could never serve.
        codec::decode_bytes(&bytes)
            .map_err(|e| ApiError::BadRequest(format!("undecodable upload: {e}")))?;

        let entry = state
            .library
            .add_upload(&filename, &bytes)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        state.thumbnails.invalidate(&entry.name);
        stored = Some(entry.name);
    }

    let filename =
        stored.ok_or_else(|| ApiError::BadRequest("missing image field".to_string()))?;
    Ok(Json(json!({ "status": "ok", "filename": filename })))
}

#[derive(Debug, Deserialize)]
pub struct FileRequest {
    pub filename: String,
}

pub async fn handle_delete(
    State(state): State<AppState>,
    Json(request): Json<FileRequest>,
) -> Result<Json<Value>, ApiError> {
    let removed = state
        .library
        .remove(&request.filename)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match removed {
        Some(entry) => {
            state.thumbnails.invalidate(&entry.name);
            // Drop a stale pin to the deleted file.
            let mut pinned = state.pinned.lock().expect("pinned lock poisoned");
            if pinned.as_deref() == Some(entry.name.as_str()) {
                *pinned = None;
            }
            Ok(Json(json!({ "status": "ok" })))
        }
        None => Err(ApiError::ImageNotFound),
    }
}

pub async fn handle_display(
    State(state): State<AppState>,
    Json(request): Json<FileRequest>,
) -> Result<Json<Value>, ApiError> {
    if state.library.find(&request.filename).is_none() {
        return Err(ApiError::ImageNotFound);
    }

    *state.pinned.lock().expect("pinned lock poisoned") = Some(request.filename.clone());
    tracing::info!(name = %request.filename, "Pinned image for next display poll");
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn handle_get_config(State(state): State<AppState>) -> Json<ProcessingSettings> {
    Json(
        state
            .settings
            .read()
            .expect("settings lock poisoned")
            .clone(),
    )
}

pub async fn handle_set_config(
    State(state): State<AppState>,
    Json(new_settings): Json<ProcessingSettings>,
) -> Json<Value> {
    *state.settings.write().expect("settings lock poisoned") = new_settings;
    tracing::info!("Processing settings updated via API");
    Json(json!({ "status": "ok" }))
}
