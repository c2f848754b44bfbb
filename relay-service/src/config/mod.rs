use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable holding the RapidAPI key for Judge0.
pub const JUDGE0_API_KEY_VAR: &str = "JUDGE0_API_KEY";

const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_JUDGE0_API_BASE_URL: &str = "https://judge0-ce.p.rapidapi.com";
const DEFAULT_JUDGE0_RAPIDAPI_HOST: &str = "judge0-ce.p.rapidapi.com";

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub judge0: Judge0Settings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Judge0Settings {
    pub api_base_url: String,
    /// Value sent as `X-RapidAPI-Host`.
    pub rapidapi_host: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

impl Default for Judge0Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_JUDGE0_API_BASE_URL.to_string(),
            rapidapi_host: DEFAULT_JUDGE0_RAPIDAPI_HOST.to_string(),
        }
    }
}

impl RelayConfig {
    /// Load upstream settings. Secrets are not read here; handlers look them up per request.
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(RelayConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_base_url: get_env("GEMINI_API_BASE_URL", DEFAULT_GEMINI_API_BASE_URL)?,
                model: get_env("GEMINI_MODEL", DEFAULT_GEMINI_MODEL)?,
            },
            judge0: Judge0Settings {
                api_base_url: get_env("JUDGE0_API_BASE_URL", DEFAULT_JUDGE0_API_BASE_URL)?,
                rapidapi_host: get_env("JUDGE0_RAPIDAPI_HOST", DEFAULT_JUDGE0_RAPIDAPI_HOST)?,
            },
        })
    }
}

fn get_env(key: &str, default: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if val.trim().is_empty() => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is set but empty",
            key
        ))),
        Ok(val) => Ok(val.trim_end_matches('/').to_string()),
        Err(env::VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} could not be read: {}",
            key,
            e
        ))),
    }
}
