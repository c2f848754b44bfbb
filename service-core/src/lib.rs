//! service-core: Shared infrastructure for the relay services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use serde;
pub use tokio;
pub use tracing;
