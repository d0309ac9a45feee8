//! Test application factory driving the real router in-process.

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use photoframe::codec::ServeFormat;
use photoframe::models::ProcessingSettings;
use photoframe::server::{build_router, create_app_state, AppState};

const MULTIPART_BOUNDARY: &str = "----photoframe-test-boundary";

/// Router plus direct access to state for assertions. Keeps the temp
/// album directory alive for the app's lifetime.
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
    _albums: TempDir,
}

impl TestApp {
    /// App over the standard album fixture with default settings.
    pub fn new(format: ServeFormat) -> Self {
        Self::with_settings(format, ProcessingSettings::default())
    }

    /// App over the standard album fixture with custom settings.
    pub fn with_settings(format: ServeFormat, settings: ProcessingSettings) -> Self {
        Self::build(super::fixtures::album_fixture(), format, settings)
    }

    /// App over an empty album directory.
    pub fn empty(format: ServeFormat) -> Self {
        Self::build(
            super::fixtures::empty_fixture(),
            format,
            ProcessingSettings::default(),
        )
    }

    fn build(albums: TempDir, format: ServeFormat, settings: ProcessingSettings) -> Self {
        let state = create_app_state(albums.path(), format, settings, None)
            .expect("failed to create app state");
        let router = build_router(state.clone());
        Self {
            router,
            state,
            _albums: albums,
        }
    }

    /// Make a GET request to the given path.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request with custom headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::get(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a multipart POST with one file field.
    pub async fn post_file(
        &self,
        path: &str,
        field: &str,
        filename: &str,
        bytes: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let request = Request::post(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Collected response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("body is not valid JSON")
    }

    /// A response header as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
