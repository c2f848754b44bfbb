//! Outcome of a single outbound call to a third-party API.

use axum::http::StatusCode;
use reqwest::{RequestBuilder, Response};
use service_core::error::AppError;
use std::time::Instant;
use thiserror::Error;

use super::metrics::record_upstream_call;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The API answered, but with a non-success status.
    #[error("{service} responded with {status}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The request never produced a readable response.
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// A success response whose body was not valid JSON.
    #[error("{service} returned a malformed body: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    /// Transport error with the request URL stripped. The Gemini URL carries the API key.
    pub fn transport(service: &'static str, source: reqwest::Error) -> Self {
        UpstreamError::Transport {
            service,
            source: source.without_url(),
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status {
                service,
                status,
                body,
            } => AppError::Upstream {
                service,
                status,
                body,
            },
            other => AppError::InternalError(anyhow::Error::new(other)),
        }
    }
}

/// Send a prepared request and decode a JSON body from a success response.
///
/// Non-success responses are returned as [`UpstreamError::Status`] with the raw
/// body text. Every call is recorded in the upstream metrics.
pub async fn send_json(
    service: &'static str,
    request: RequestBuilder,
) -> Result<serde_json::Value, UpstreamError> {
    let start = Instant::now();
    let result = execute(service, request).await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(UpstreamError::Status { .. }) => "error_status",
        Err(UpstreamError::Transport { .. }) => "transport_failure",
        Err(UpstreamError::Decode { .. }) => "decode_failure",
    };
    record_upstream_call(service, outcome, start.elapsed());

    result
}

async fn execute(
    service: &'static str,
    request: RequestBuilder,
) -> Result<serde_json::Value, UpstreamError> {
    let response: Response = request
        .send()
        .await
        .map_err(|e| UpstreamError::transport(service, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| UpstreamError::transport(service, e))?;

    if !status.is_success() {
        tracing::warn!(service, status = %status, "Upstream API returned an error status");
        return Err(UpstreamError::Status {
            service,
            status,
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| UpstreamError::Decode { service, source })
}
