//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::handlers::{
    generate_text, health_check, method_not_allowed, metrics::metrics, readiness_check,
    submit_code,
};
use crate::services::{EnvSecretStore, GeminiClient, Judge0Client, SecretStore};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware, tracing::REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub gemini: GeminiClient,
    pub judge0: Judge0Client,
    pub secrets: Arc<dyn SecretStore>,
}

impl AppState {
    /// Build the upstream clients from configuration around one connection pool.
    pub fn new(config: &RelayConfig, secrets: Arc<dyn SecretStore>) -> Self {
        let client = reqwest::Client::new();

        Self {
            gemini: GeminiClient::new(client.clone(), config.gemini.clone()),
            judge0: Judge0Client::new(client, config.judge0.clone()),
            secrets,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/gemini",
            post(generate_text).fallback(method_not_allowed),
        )
        .route("/api/judge0", post(submit_code).fallback(method_not_allowed))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .route_layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    path = %request.uri().path(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost so the span above sees the id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application reading secrets from the process environment.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        Self::build_with_secrets(config, Arc::new(EnvSecretStore)).await
    }

    /// Build the application with an explicit secret source.
    pub async fn build_with_secrets(
        config: RelayConfig,
        secrets: Arc<dyn SecretStore>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(&config, secrets);

        tracing::info!(
            gemini_model = %config.gemini.model,
            gemini_base_url = %config.gemini.api_base_url,
            judge0_base_url = %config.judge0.api_base_url,
            "Initialized upstream clients"
        );

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Relay service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
