//! HTTP handlers for relay-service.

pub mod gemini;
pub mod health;
pub mod judge0;
pub mod metrics;

use service_core::error::AppError;

pub use gemini::generate_text;
pub use health::{health_check, readiness_check};
pub use judge0::submit_code;

/// Fallback for relay routes hit with anything but POST.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
