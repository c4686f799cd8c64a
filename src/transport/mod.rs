//! # Backend Collaborators
//!
//! The job client talks to the backend only through these two traits. The
//! bundled [`HttpBackend`] implements both against the OptiRoute REST API;
//! tests substitute scripted implementations.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{JobHandle, JobStatusReport, UploadFile};

pub use http::HttpBackend;

/// Successful upload acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub job_id: String,
}

impl UploadReceipt {
    pub fn handle(&self) -> JobHandle {
        JobHandle::new(self.job_id.clone())
    }
}

/// Why an upload did not produce a job
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The backend answered with a non-success status
    #[error("upload rejected with HTTP {status_code}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected {
        status_code: u16,
        detail: Option<String>,
    },

    /// The backend accepted the file but the acknowledgement was unusable
    #[error("invalid upload response: {0}")]
    InvalidResponse(String),

    /// No response at all
    #[error("upload transport failure: {0}")]
    Transport(String),
}

/// A status query that failed below the application level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("status query failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Hands a file to the backend and returns the new job's identifier.
///
/// Called at most once per submission.
#[async_trait]
pub trait UploadCollaborator: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Result<UploadReceipt, UploadError>;
}

/// Reads the current status of a job. Idempotent and side-effect-free.
#[async_trait]
pub trait StatusCollaborator: Send + Sync {
    async fn get_status(&self, handle: &JobHandle) -> Result<JobStatusReport, TransportError>;
}
