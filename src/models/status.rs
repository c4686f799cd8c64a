use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Job status as reported by the results endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RawJobStatus {
    /// Queued, not yet picked up by a worker
    Pending,
    /// A worker is geocoding and optimizing
    Processing,
    Completed,
    Failed,
}

impl RawJobStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Processing, Self::Completed, Self::Failed];

    /// Check if this is a terminal status by nature (polling must stop)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RawJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RawJobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("Invalid job status: {s}")),
        }
    }
}

/// One status observation for a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub status: RawJobStatus,
    /// Opaque payload, only meaningful once the status is terminal
    #[serde(default)]
    pub result: Option<Value>,
}

impl JobStatusReport {
    pub fn new(status: RawJobStatus, result: Option<Value>) -> Self {
        Self {
            job_id: None,
            status,
            result,
        }
    }

    pub fn pending() -> Self {
        Self::new(RawJobStatus::Pending, None)
    }

    pub fn processing() -> Self {
        Self::new(RawJobStatus::Processing, None)
    }

    pub fn completed(result: Value) -> Self {
        Self::new(RawJobStatus::Completed, Some(result))
    }

    pub fn failed(result: Value) -> Self {
        Self::new(RawJobStatus::Failed, Some(result))
    }

    /// The payload's top-level `error` text, if the backend attached one
    pub fn error_message(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|r| r.get("error"))
            .and_then(Value::as_str)
    }
}
