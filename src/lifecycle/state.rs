use std::fmt;

use crate::error::{LifecycleError, ShapingError};
use crate::models::{DisplayModel, JobHandle};

/// Why a submission ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected client-side before any upload
    InvalidFile,
    /// The backend refused the upload
    UploadRejected,
    /// The backend could not be reached (upload or status query)
    ConnectionError,
    /// The backend reported the job as failed
    JobFailed,
    /// A completed payload could not be shaped
    Shaping(ShapingError),
}

/// The single source of truth the presentation layer observes
#[derive(Debug, Clone, Default, PartialEq)]
pub enum JobLifecycleState {
    #[default]
    Idle,
    Submitting,
    Polling {
        handle: JobHandle,
    },
    Resolved {
        handle: JobHandle,
        display_model: Box<DisplayModel>,
    },
    Failed {
        handle: Option<JobHandle>,
        reason: String,
        kind: FailureKind,
    },
}

/// Inputs that drive the lifecycle state machine
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Submit,
    Uploaded(JobHandle),
    Resolve(Box<DisplayModel>),
    Fail { reason: String, kind: FailureKind },
    Reset,
}

impl LifecycleEvent {
    pub fn fail(reason: impl Into<String>, kind: FailureKind) -> Self {
        Self::Fail {
            reason: reason.into(),
            kind,
        }
    }

    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Uploaded(_) => "uploaded",
            Self::Resolve(_) => "resolve",
            Self::Fail { .. } => "fail",
            Self::Reset => "reset",
        }
    }
}

impl JobLifecycleState {
    /// Determine the next state for `event`.
    ///
    /// Reset is accepted from anywhere; everything else only moves forward.
    pub fn apply(&self, event: LifecycleEvent) -> Result<Self, LifecycleError> {
        let next = match (self, event) {
            (_, LifecycleEvent::Reset) => Self::Idle,

            (Self::Idle, LifecycleEvent::Submit) => Self::Submitting,

            (Self::Submitting, LifecycleEvent::Uploaded(handle)) => Self::Polling { handle },
            (Self::Submitting, LifecycleEvent::Fail { reason, kind }) => Self::Failed {
                handle: None,
                reason,
                kind,
            },

            (Self::Polling { handle }, LifecycleEvent::Resolve(display_model)) => Self::Resolved {
                handle: handle.clone(),
                display_model,
            },
            (Self::Polling { handle }, LifecycleEvent::Fail { reason, kind }) => Self::Failed {
                handle: Some(handle.clone()),
                reason,
                kind,
            },

            (from_state, event) => {
                return Err(LifecycleError::InvalidTransition {
                    from: from_state.name().to_string(),
                    event: event.event_type().to_string(),
                })
            }
        };

        Ok(next)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Polling { .. } => "polling",
            Self::Resolved { .. } => "resolved",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn handle(&self) -> Option<&JobHandle> {
        match self {
            Self::Polling { handle } | Self::Resolved { handle, .. } => Some(handle),
            Self::Failed { handle, .. } => handle.as_ref(),
            Self::Idle | Self::Submitting => None,
        }
    }

    /// Check if this is a terminal state (only a reset leaves it)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved { .. } | Self::Failed { .. })
    }

    /// Check if a submission is still being worked on
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitting | Self::Polling { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn display_model(&self) -> Option<&DisplayModel> {
        match self {
            Self::Resolved { display_model, .. } => Some(display_model),
            _ => None,
        }
    }
}

impl fmt::Display for JobLifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle() {
            Some(handle) => write!(f, "{} ({})", self.name(), handle),
            None => f.write_str(self.name()),
        }
    }
}
