use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Image not found")]
    ImageNotFound,

    #[error("No images available")]
    NoImages,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Processing error: {0}")]
    Pipeline(#[from] epaper_pipeline::PipelineError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingParameter(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ImageNotFound | ApiError::NoImages => StatusCode::NOT_FOUND,
            ApiError::Codec(_) | ApiError::Pipeline(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
