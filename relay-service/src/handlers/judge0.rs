use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use service_core::error::AppError;
use validator::{Validate, ValidationError};

use crate::config::JUDGE0_API_KEY_VAR;
use crate::services::judge0::Submission;
use crate::startup::AppState;

pub const FIELDS_REQUIRED: &str = "language_id and source_code are required";
pub const API_KEY_NOT_CONFIGURED: &str = "Judge0 API key not configured on the server";

/// Inbound submission. `source_code` may be empty but must be present.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SubmitCodeRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_language_id"))]
    pub language_id: Value,
    #[validate(required)]
    pub source_code: Option<String>,
}

impl SubmitCodeRequest {
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

fn validate_language_id(value: &Value) -> Result<(), ValidationError> {
    if is_truthy(value) {
        Ok(())
    } else {
        Err(ValidationError::new("language_id"))
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy, everything else is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn submit_code(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let request = SubmitCodeRequest::from_body(&body);
    request
        .validate()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!(FIELDS_REQUIRED)))?;

    let api_key = state
        .secrets
        .lookup(JUDGE0_API_KEY_VAR)
        .ok_or_else(|| AppError::NotConfigured(API_KEY_NOT_CONFIGURED.to_string()))?;

    let submission = Submission {
        language_id: &request.language_id,
        source_code: request.source_code.as_deref().unwrap_or_default(),
    };

    let result = state.judge0.submit(&api_key, &submission).await?;

    Ok(Json(result))
}
