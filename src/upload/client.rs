use crate::upload::types::{ErrorBody, ProcessOutcome, SelectedFile, SubmitError};
use reqwest::multipart;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// Processing a document takes 1-2 minutes nominally; leave headroom.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for the remote processing service. Cheap to clone; one clone is
/// handed to the worker thread per upload attempt.
#[derive(Clone)]
pub struct ProcessClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
}

impl ProcessClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve a retrieval locator to an openable URL. The service hands out
    /// server-relative paths like `/api/download/extracted/<job_id>`.
    pub fn artifact_url(&self, locator: &str) -> String {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            locator.to_string()
        } else {
            format!("{}{}", self.base_url, locator)
        }
    }

    /// Issue the one submission request: the file as the sole multipart
    /// field, then decode the result or derive the failure message.
    pub async fn submit(&self, file: &SelectedFile) -> Result<ProcessOutcome, SubmitError> {
        let url = format!("{}/api/process", self.base_url);
        debug!("Submitting {} ({}) to {}", file.name, file.display_size(), url);

        let bytes = tokio::fs::read(&file.path).await?;
        let part = multipart::Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubmitError::Interrupted
                } else {
                    SubmitError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            if let Ok(ErrorBody {
                detail: Some(detail),
            }) = serde_json::from_slice(&body)
            {
                warn!("Service rejected {}: {} ({})", file.name, detail, status);
                return Err(SubmitError::Rejected { detail });
            }
            warn!("Service rejected {} with status {}", file.name, status);
            return Err(SubmitError::Status(status));
        }

        let outcome = response
            .json::<ProcessOutcome>()
            .await
            .map_err(|e| SubmitError::Malformed(e.to_string()))?;
        info!("Processed {}: {}", file.name, outcome.stats_line());
        Ok(outcome)
    }
}
