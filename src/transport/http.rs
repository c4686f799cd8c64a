//! # HTTP Backend
//!
//! reqwest implementation of both collaborators:
//!
//! - `POST {base_url}{upload_path}` with a multipart `file` part, answering
//!   `{"job_id": ...}` or an error body `{"detail": ...}`
//! - `GET {base_url}{results_path}/{job_id}`, answering
//!   `{"job_id", "status", "result"}`

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::{
    StatusCollaborator, TransportError, UploadCollaborator, UploadError, UploadReceipt,
};
use crate::config::BackendConfig;
use crate::constants::defaults;
use crate::error::{ClientError, ClientResult};
use crate::models::{JobHandle, JobStatusReport, UploadFile};

/// HTTP client for the upload and results endpoints
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
    upload_url: Url,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.config.base_url)
            .field("upload_url", &self.upload_url.as_str())
            .field("timeout_ms", &self.config.request_timeout_ms)
            .finish()
    }
}

impl HttpBackend {
    /// Create a backend client, validating the configured URLs up front
    pub fn new(config: BackendConfig) -> ClientResult<Self> {
        let upload_url = endpoint(&config.base_url, &config.upload_path)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(format!("optiroute-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(
            base_url = %config.base_url,
            timeout_ms = config.request_timeout_ms,
            "Created OptiRoute HTTP backend"
        );

        Ok(Self {
            client,
            config,
            upload_url,
        })
    }

    /// The job id is pushed as one encoded path segment
    fn results_url(&self, handle: &JobHandle) -> ClientResult<Url> {
        let mut url = endpoint(
            &self.config.base_url,
            self.config.results_path.trim_end_matches('/'),
        )?;
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::config_error(format!(
                    "Base URL {} cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .push(handle.id());
        Ok(url)
    }
}

#[async_trait]
impl UploadCollaborator for HttpBackend {
    async fn upload(&self, file: &UploadFile) -> Result<UploadReceipt, UploadError> {
        debug!(
            url = %self.upload_url,
            file_name = %file.name,
            size_bytes = file.contents.len(),
            "Uploading stop file"
        );

        let part = Part::bytes(file.contents.clone()).file_name(file.name.clone());
        let form = Form::new().part(defaults::UPLOAD_FIELD_NAME, part);

        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Network error uploading stop file");
                UploadError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            let receipt = response.json::<UploadReceipt>().await.map_err(|e| {
                error!(error = %e, "Failed to parse upload response");
                UploadError::InvalidResponse(e.to_string())
            })?;
            info!(job_id = %receipt.job_id, "Stop file accepted");
            Ok(receipt)
        } else {
            let body = response.text().await.unwrap_or_default();
            let detail = rejection_detail(&body);
            warn!(status = %status, detail = ?detail, "Upload rejected");
            Err(UploadError::Rejected {
                status_code: status.as_u16(),
                detail,
            })
        }
    }
}

#[async_trait]
impl StatusCollaborator for HttpBackend {
    async fn get_status(&self, handle: &JobHandle) -> Result<JobStatusReport, TransportError> {
        let url = self
            .results_url(handle)
            .map_err(|e| TransportError::new(e.to_string()))?;

        debug!(url = %url, job_id = %handle, "Querying job status");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, job_id = %handle, "Failed to get job status");
            return Err(TransportError::new(format!("HTTP {}: {}", status, error_text)));
        }

        response.json::<JobStatusReport>().await.map_err(|e| {
            TransportError::new(format!("Failed to parse job status response: {}", e))
        })
    }
}

fn endpoint(base_url: &str, path: &str) -> ClientResult<Url> {
    let joined = format!("{}{}", base_url.trim_end_matches('/'), path);
    Url::parse(&joined)
        .map_err(|e| ClientError::config_error(format!("Invalid endpoint URL {joined}: {e}")))
}

/// The `detail` string of an error body, when there is one
fn rejection_detail(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .filter(|detail| !detail.trim().is_empty())
        .map(str::to_string)
}
