//! # Job Client
//!
//! Owns one submission at a time: validate, upload, poll, shape, and publish
//! every lifecycle transition on a watch channel.
//!
//! Every submission gets a generation number. Upload results and poll
//! callbacks carry the generation they were started under and are dropped
//! when it no longer matches, so nothing from a reset or superseded
//! submission can reach the published state.

use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::state::{FailureKind, JobLifecycleState, LifecycleEvent};
use crate::config::{ClientConfig, UploadConfig};
use crate::constants::messages;
use crate::error::ClientResult;
use crate::logging::log_job_operation;
use crate::models::{JobHandle, JobStatusReport, RawJobStatus, UploadFile};
use crate::polling::{JobPoller, PollGuard, PollOutcome};
use crate::shaping::{ResultShaper, ShapedResult};
use crate::transport::{HttpBackend, StatusCollaborator, UploadCollaborator, UploadError};

/// Lifecycle snapshots, starting with the state current at subscription.
///
/// Backed by a watch channel: a slow consumer sees the latest state rather
/// than every intermediate one. Ends when the client is dropped.
pub type LifecycleStream = BoxStream<'static, JobLifecycleState>;

#[derive(Default)]
struct Session {
    generation: u64,
    poll: Option<PollGuard>,
}

struct ClientInner {
    config: ClientConfig,
    uploader: Arc<dyn UploadCollaborator>,
    status: Arc<dyn StatusCollaborator>,
    state: watch::Sender<JobLifecycleState>,
    session: Mutex<Session>,
}

/// Drives upload, polling and result shaping for one submission at a time
#[derive(Clone)]
pub struct JobClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for JobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobClient")
            .field("state", &self.inner.state.borrow().name())
            .field("backend", &self.inner.config.backend.base_url)
            .finish()
    }
}

impl JobClient {
    pub fn new(
        config: ClientConfig,
        uploader: Arc<dyn UploadCollaborator>,
        status: Arc<dyn StatusCollaborator>,
    ) -> Self {
        let (state, _) = watch::channel(JobLifecycleState::Idle);
        Self {
            inner: Arc::new(ClientInner {
                config,
                uploader,
                status,
                state,
                session: Mutex::new(Session::default()),
            }),
        }
    }

    /// Build a client that talks to the REST backend named in `config`
    pub fn with_http_backend(config: ClientConfig) -> ClientResult<Self> {
        let backend = Arc::new(HttpBackend::new(config.backend.clone())?);
        Ok(Self::new(config, backend.clone(), backend))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Start a new submission and observe it.
    ///
    /// A submission already in flight is reset first. The file is checked
    /// locally; an empty file or a disallowed extension fails without any
    /// backend call. Otherwise the upload runs on a spawned task, so this
    /// must be called from within a tokio runtime.
    pub fn submit(&self, file: UploadFile) -> LifecycleStream {
        let inner = &self.inner;
        let mut session = inner.session.lock();

        if *inner.state.borrow() != JobLifecycleState::Idle {
            debug!(previous = %inner.state.borrow().name(), "Resetting before new submission");
            inner.reset(&mut session);
        }

        session.generation += 1;
        let generation = session.generation;
        inner.apply(LifecycleEvent::Submit);
        let stream = self.subscribe();

        if let Err(reason) = check_file(&file, &inner.config.upload) {
            info!(file = %file.name, reason, "Rejecting file before upload");
            inner.apply(LifecycleEvent::fail(reason, FailureKind::InvalidFile));
            return stream;
        }

        info!(file = %file.name, size_bytes = file.contents.len(), generation, "Submitting file");
        tokio::spawn(Arc::clone(inner).upload(generation, file));
        stream
    }

    /// Abandon the current submission and return to `Idle`.
    ///
    /// The poller is cancelled and any upload still in flight has its result
    /// discarded when it arrives.
    pub fn reset(&self) {
        let mut session = self.inner.session.lock();
        self.inner.reset(&mut session);
    }

    pub fn state(&self) -> JobLifecycleState {
        self.inner.state.borrow().clone()
    }

    /// Observe lifecycle transitions without submitting
    pub fn subscribe(&self) -> LifecycleStream {
        let rx = self.inner.state.subscribe();
        stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let state = rx.borrow_and_update().clone();
            Some((state, (rx, false)))
        })
        .boxed()
    }

    /// Wait until no submission is in flight and return the state reached
    pub async fn settled(&self) -> JobLifecycleState {
        let mut rx = self.inner.state.subscribe();
        let settled = rx
            .wait_for(|state| !state.is_in_flight())
            .await
            .map(|state| (*state).clone());
        match settled {
            Ok(state) => state,
            // Sender is owned by this client
            Err(_) => self.state(),
        }
    }
}

impl ClientInner {
    async fn upload(self: Arc<Self>, generation: u64, file: UploadFile) {
        let result = timeout(self.config.upload.upload_timeout(), self.uploader.upload(&file)).await;

        let mut session = self.session.lock();
        if session.generation != generation {
            debug!(generation, current = session.generation, "Discarding upload result for superseded submission");
            return;
        }

        let event = match result {
            Ok(Ok(receipt)) => {
                let handle = receipt.handle();
                let poller = JobPoller::new(self.config.polling.clone(), Arc::clone(&self.status));
                let client = Arc::downgrade(&self);
                let token = poller.start(handle.clone(), move |outcome| {
                    on_poll_outcome(&client, generation, outcome);
                });
                session.poll = Some(token.into_guard());
                LifecycleEvent::Uploaded(handle)
            }
            Ok(Err(e)) => {
                warn!(file = %file.name, error = %e, "Upload failed");
                upload_failure(e)
            }
            Err(_) => {
                warn!(
                    file = %file.name,
                    timeout_ms = self.config.upload.upload_timeout_ms,
                    "Upload timed out"
                );
                LifecycleEvent::fail(messages::UPLOAD_CONNECTION_ERROR, FailureKind::ConnectionError)
            }
        };

        self.apply(event);
    }

    fn handle_outcome(&self, generation: u64, outcome: PollOutcome) {
        let mut session = self.session.lock();
        if session.generation != generation {
            debug!(generation, current = session.generation, "Discarding poll outcome for superseded submission");
            return;
        }

        let event = match outcome {
            PollOutcome::Pending { .. } => return,
            PollOutcome::Resolved(report) => resolve(&report),
            PollOutcome::ConnectionError { reason } => {
                warn!(error = %reason, "Lost contact with results endpoint");
                LifecycleEvent::fail(messages::RESULTS_CONNECTION_ERROR, FailureKind::ConnectionError)
            }
        };

        // The poller has already stopped itself
        session.poll = None;
        self.apply(event);
    }

    fn reset(&self, session: &mut Session) {
        session.generation += 1;
        session.poll = None;
        self.apply(LifecycleEvent::Reset);
    }

    fn apply(&self, event: LifecycleEvent) {
        let event_type = event.event_type();
        let mut rejected = None;

        let changed = self.state.send_if_modified(|state| match state.apply(event) {
            Ok(next) => {
                log_job_operation(
                    event_type,
                    next.handle().map(JobHandle::id),
                    next.name(),
                    next.reason(),
                );
                let changed = *state != next;
                *state = next;
                changed
            }
            Err(e) => {
                rejected = Some(e);
                false
            }
        });

        if let Some(e) = rejected {
            error!(error = %e, "Lifecycle transition rejected");
        } else if !changed {
            debug!(event = event_type, "Lifecycle event left state unchanged");
        }
    }
}

fn on_poll_outcome(client: &Weak<ClientInner>, generation: u64, outcome: PollOutcome) {
    match client.upgrade() {
        Some(inner) => inner.handle_outcome(generation, outcome),
        None => debug!("JobClient dropped, ignoring poll outcome"),
    }
}

/// Turn a terminal status report into the lifecycle event it implies
fn resolve(report: &JobStatusReport) -> LifecycleEvent {
    match report.status {
        RawJobStatus::Completed => {
            let payload = report.result.as_ref().unwrap_or(&Value::Null);
            match ResultShaper::shape(payload) {
                Ok(ShapedResult::Route(model)) => LifecycleEvent::Resolve(Box::new(model)),
                Ok(ShapedResult::BackendError { message }) => LifecycleEvent::fail(
                    message.unwrap_or_else(|| messages::JOB_FAILED_FALLBACK.to_string()),
                    FailureKind::JobFailed,
                ),
                Err(e) => {
                    warn!(error = %e, "Completed job returned an unusable payload");
                    LifecycleEvent::fail(messages::INCOMPLETE_DATA, FailureKind::Shaping(e))
                }
            }
        }
        _ => {
            let reason = report
                .error_message()
                .filter(|message| !message.trim().is_empty())
                .unwrap_or(messages::JOB_FAILED_FALLBACK);
            LifecycleEvent::fail(reason, FailureKind::JobFailed)
        }
    }
}

fn upload_failure(error: UploadError) -> LifecycleEvent {
    match error {
        UploadError::Rejected { detail, .. } => LifecycleEvent::fail(
            detail
                .filter(|detail| !detail.trim().is_empty())
                .unwrap_or_else(|| messages::UPLOAD_SERVER_ERROR.to_string()),
            FailureKind::UploadRejected,
        ),
        UploadError::InvalidResponse(_) => {
            LifecycleEvent::fail(messages::UPLOAD_SERVER_ERROR, FailureKind::UploadRejected)
        }
        UploadError::Transport(_) => {
            LifecycleEvent::fail(messages::UPLOAD_CONNECTION_ERROR, FailureKind::ConnectionError)
        }
    }
}

fn check_file(file: &UploadFile, upload: &UploadConfig) -> Result<(), &'static str> {
    if file.is_empty() {
        return Err(messages::NO_FILE_SELECTED);
    }
    match file.extension() {
        Some(ext) if upload.allows_extension(&ext) => Ok(()),
        _ => Err(messages::INVALID_FILE_TYPE),
    }
}
