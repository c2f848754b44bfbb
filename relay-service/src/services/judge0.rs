//! Judge0 submission client (RapidAPI hosted).

use crate::config::Judge0Settings;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;

use super::upstream::{send_json, UpstreamError};

/// Name used in error messages and metric labels.
pub const SERVICE_NAME: &str = "Judge0";

const RAPIDAPI_KEY_HEADER: &str = "X-RapidAPI-Key";
const RAPIDAPI_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Submissions always block until the run finishes and use plain-text payloads.
const SUBMISSION_QUERY: [(&str, &str); 2] = [("base64_encoded", "false"), ("wait", "true")];

/// A validated submission ready to forward.
#[derive(Debug, Serialize)]
pub struct Submission<'a> {
    pub language_id: &'a Value,
    pub source_code: &'a str,
}

#[derive(Debug, Clone)]
pub struct Judge0Client {
    client: Client,
    settings: Judge0Settings,
}

impl Judge0Client {
    pub fn new(client: Client, settings: Judge0Settings) -> Self {
        Self { client, settings }
    }

    fn submissions_url(&self) -> String {
        format!("{}/submissions", self.settings.api_base_url)
    }

    /// Run a submission synchronously and return the execution result untouched.
    pub async fn submit(
        &self,
        api_key: &Secret<String>,
        submission: &Submission<'_>,
    ) -> Result<Value, UpstreamError> {
        tracing::debug!(
            language_id = %submission.language_id,
            source_len = submission.source_code.len(),
            "Submitting code to Judge0"
        );

        let builder = self
            .client
            .post(self.submissions_url())
            .query(&SUBMISSION_QUERY)
            .header(RAPIDAPI_KEY_HEADER, api_key.expose_secret())
            .header(RAPIDAPI_HOST_HEADER, &self.settings.rapidapi_host)
            .json(submission);

        send_json(SERVICE_NAME, builder).await
    }
}
