use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

use crate::config::GEMINI_API_KEY_VAR;
use crate::services::gemini::extract_generated_text;
use crate::startup::AppState;

pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const API_KEY_NOT_CONFIGURED: &str = "API key not configured on the server";

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateTextRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Prompt is required"))]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateTextResponse {
    pub text: String,
}

impl GenerateTextRequest {
    /// Parse a raw body. Anything that is not an object with a string `prompt`
    /// is treated as a request without a prompt.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn generate_text(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateTextResponse>, AppError> {
    let request = GenerateTextRequest::from_body(&body);
    request
        .validate()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!(PROMPT_REQUIRED)))?;

    let api_key = state
        .secrets
        .lookup(GEMINI_API_KEY_VAR)
        .ok_or_else(|| AppError::NotConfigured(API_KEY_NOT_CONFIGURED.to_string()))?;

    let response = state
        .gemini
        .generate_content(&api_key, &request.prompt)
        .await?;

    Ok(Json(GenerateTextResponse {
        text: extract_generated_text(&response),
    }))
}
