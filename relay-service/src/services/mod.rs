pub mod gemini;
pub mod judge0;
pub mod metrics;
pub mod secrets;
pub mod upstream;

pub use gemini::GeminiClient;
pub use judge0::Judge0Client;
pub use secrets::{EnvSecretStore, SecretStore, StaticSecretStore};
pub use upstream::UpstreamError;
