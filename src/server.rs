//! HTTP server setup and shared application state.
//!
//! This module provides the router and state used by both the production
//! `serve` command and the integration tests, so the two always exercise
//! the same wiring.

use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use epaper_pipeline::Palette;

use crate::api;
use crate::codec::ServeFormat;
use crate::models::ProcessingSettings;
use crate::services::{ImageLibrary, ThumbnailCache};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<ImageLibrary>,
    pub thumbnails: Arc<ThumbnailCache>,
    pub settings: Arc<RwLock<ProcessingSettings>>,
    pub serve_format: ServeFormat,
    pub device_palette: Option<Palette>,
    /// File pinned by `POST /api/display`; consumed by the next `/image`.
    pub pinned: Arc<Mutex<Option<String>>>,
}

/// Create application state by scanning the album directory.
pub fn create_app_state(
    album_dir: &Path,
    serve_format: ServeFormat,
    settings: ProcessingSettings,
    device_palette: Option<Palette>,
) -> anyhow::Result<AppState> {
    let library = Arc::new(ImageLibrary::scan(album_dir)?);
    if library.is_empty() {
        tracing::warn!(
            root = %album_dir.display(),
            "No images found; the gallery can populate it via upload"
        );
    }

    Ok(AppState {
        library,
        thumbnails: Arc::new(ThumbnailCache::new()),
        settings: Arc::new(RwLock::new(settings)),
        serve_format,
        device_palette,
        pinned: Arc::new(Mutex::new(None)),
    })
}

/// Build the router with all endpoints and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Frame-facing endpoints
        .route("/image", get(api::handle_image))
        .route("/thumbnail", get(api::handle_thumbnail))
        .route("/status", get(api::handle_status))
        // Gallery API
        .route("/api/images", get(api::handle_list_images))
        .route("/api/upload", post(api::handle_upload))
        .route("/api/delete", post(api::handle_delete))
        .route("/api/display", post(api::handle_display))
        .route(
            "/api/config",
            get(api::handle_get_config).post(api::handle_set_config),
        )
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
