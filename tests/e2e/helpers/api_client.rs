use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Drives the router in-process, no socket involved
#[derive(Clone)]
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path).await
    }

    async fn request(&self, method: Method, path: &str) -> Result<ApiResponse> {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let body_bytes = response.into_body().collect().await?.to_bytes().to_vec();

        // Try to parse as JSON, but don't fail if it's not JSON (e.g., plain text)
        let body = serde_json::from_slice(&body_bytes).ok();

        Ok(ApiResponse {
            status,
            body,
            body_bytes,
        })
    }
}

pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub body_bytes: Vec<u8>,
}

impl ApiResponse {
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body_bytes)
        );
    }

    /// Body as a JSON array of strings
    pub fn string_list(&self) -> Vec<String> {
        serde_json::from_value(self.body.clone().expect("Response body is not JSON"))
            .expect("Response body is not a list of strings")
    }
}
