#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use relay_service::config::{
    GeminiSettings, Judge0Settings, RelayConfig, GEMINI_API_KEY_VAR, JUDGE0_API_KEY_VAR,
};
use relay_service::services::StaticSecretStore;
use relay_service::startup::{build_router, AppState};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::MockServer;

pub const TEST_GEMINI_KEY: &str = "test-gemini-key";
pub const TEST_JUDGE0_KEY: &str = "test-judge0-key";
pub const TEST_RAPIDAPI_HOST: &str = "judge0.test.local";
pub const TEST_MODEL: &str = "gemini-test";

/// Router wired to a local mock standing in for both upstream APIs.
pub struct TestApp {
    pub router: Router,
    pub upstream: MockServer,
}

impl TestApp {
    /// Spawn with both secrets configured.
    pub async fn spawn() -> Self {
        Self::spawn_with_secrets(
            StaticSecretStore::new()
                .with(GEMINI_API_KEY_VAR, TEST_GEMINI_KEY)
                .with(JUDGE0_API_KEY_VAR, TEST_JUDGE0_KEY),
        )
        .await
    }

    pub async fn spawn_with_secrets(secrets: StaticSecretStore) -> Self {
        let upstream = MockServer::start().await;
        let base_url = upstream.uri();
        Self::spawn_against(upstream, base_url, secrets)
    }

    /// Spawn with upstream base URLs pointing at a port nothing listens on.
    pub async fn spawn_unreachable() -> Self {
        let upstream = MockServer::start().await;
        Self::spawn_against(
            upstream,
            "http://127.0.0.1:9".to_string(),
            StaticSecretStore::new()
                .with(GEMINI_API_KEY_VAR, TEST_GEMINI_KEY)
                .with(JUDGE0_API_KEY_VAR, TEST_JUDGE0_KEY),
        )
    }

    fn spawn_against(upstream: MockServer, base_url: String, secrets: StaticSecretStore) -> Self {
        let config = RelayConfig {
            common: CoreConfig {
                port: 0,
                ..CoreConfig::default()
            },
            gemini: GeminiSettings {
                api_base_url: base_url.clone(),
                model: TEST_MODEL.to_string(),
            },
            judge0: Judge0Settings {
                api_base_url: base_url,
                rapidapi_host: TEST_RAPIDAPI_HOST.to_string(),
            },
        };

        let state = AppState::new(&config, Arc::new(secrets));

        TestApp {
            router: build_router(state),
            upstream,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("Failed to build request"),
            )
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let (status, text) = self.request(Method::POST, uri, &body.to_string()).await;
        let json = serde_json::from_str(&text).expect("Response body is not JSON");
        (status, json)
    }

    /// Number of requests the mock upstream has seen.
    pub async fn upstream_calls(&self) -> usize {
        self.upstream
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}
