//! # Job Status Poller
//!
//! Drives the status collaborator for one job handle until a terminal status
//! is observed, the transport fails, or the caller cancels.
//!
//! A poller is either `Active` or `Stopped`. While active it waits one poll
//! interval, issues exactly one status query, waits for it to finish and only
//! then schedules the next wait, so queries for a handle never overlap and
//! are applied in the order they were issued.
//!
//! Cancellation marks the shared [`CancelToken`] as stopped. The pending wait
//! is abandoned immediately; a query already in flight is allowed to finish
//! but its result is discarded.

mod token;

use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PollingConfig;
use crate::models::{JobHandle, JobStatusReport, RawJobStatus};
use crate::transport::StatusCollaborator;

pub use token::{CancelToken, PollGuard, PollerPhase, StopReason};

/// What one poll tick produced
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Non-terminal status; another tick follows
    Pending { status: RawJobStatus },
    /// Terminal status with its payload
    Resolved(JobStatusReport),
    /// The status query itself failed; polling has stopped for good
    ConnectionError { reason: String },
}

impl PollOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}

/// Single-use poller bound to one job handle once started
pub struct JobPoller {
    poller_id: Uuid,
    config: PollingConfig,
    status: Arc<dyn StatusCollaborator>,
}

impl std::fmt::Debug for JobPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPoller")
            .field("poller_id", &self.poller_id)
            .field("config", &self.config)
            .finish()
    }
}

impl JobPoller {
    pub fn new(config: PollingConfig, status: Arc<dyn StatusCollaborator>) -> Self {
        Self {
            poller_id: Uuid::new_v4(),
            config,
            status,
        }
    }

    pub fn poller_id(&self) -> Uuid {
        self.poller_id
    }

    /// Start polling `handle` on the current tokio runtime.
    ///
    /// `on_status` receives every `Pending` observation and then exactly one
    /// terminal outcome, unless the returned token is cancelled first. The
    /// token is already `Stopped` by the time the terminal outcome is
    /// delivered.
    pub fn start<F>(self, handle: JobHandle, on_status: F) -> CancelToken
    where
        F: FnMut(PollOutcome) + Send + 'static,
    {
        let token = CancelToken::new(handle.clone());

        info!(
            poller_id = %self.poller_id,
            job_id = %handle,
            poll_interval_ms = self.config.poll_interval_ms,
            "Starting JobPoller"
        );

        tokio::spawn(self.run(handle, token.clone(), on_status));
        token
    }

    /// Stop the poller owning `token`; no callbacks follow
    pub fn cancel(token: &CancelToken) {
        token.cancel();
    }

    async fn run<F>(self, handle: JobHandle, token: CancelToken, mut on_status: F)
    where
        F: FnMut(PollOutcome) + Send + 'static,
    {
        let poller_id = self.poller_id;
        let mut tick: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = token.stopped() => {
                    debug!(poller_id = %poller_id, job_id = %handle, "JobPoller cancelled while waiting");
                    return;
                }
                () = sleep(self.config.poll_interval()) => {}
            }

            tick += 1;
            debug!(poller_id = %poller_id, job_id = %handle, tick, "Querying job status");

            let outcome = self.query(&handle).await;

            if token.is_stopped() {
                debug!(
                    poller_id = %poller_id,
                    job_id = %handle,
                    tick,
                    "Discarding status observed after cancellation"
                );
                return;
            }

            let reason = match &outcome {
                PollOutcome::Pending { status } => {
                    debug!(poller_id = %poller_id, job_id = %handle, tick, status = %status, "Job still running");
                    on_status(outcome);
                    continue;
                }
                PollOutcome::Resolved(report) => {
                    info!(poller_id = %poller_id, job_id = %handle, tick, status = %report.status, "Job reached terminal status");
                    StopReason::Resolved
                }
                PollOutcome::ConnectionError { reason } => {
                    warn!(poller_id = %poller_id, job_id = %handle, tick, error = %reason, "Status query failed, polling stopped");
                    StopReason::ConnectionError
                }
            };

            // Losing this race means a cancel landed while the query was in flight
            if token.stop(reason) {
                on_status(outcome);
            }
            return;
        }
    }

    async fn query(&self, handle: &JobHandle) -> PollOutcome {
        match timeout(self.config.status_timeout(), self.status.get_status(handle)).await {
            Ok(Ok(report)) if self.config.is_terminal(report.status) => PollOutcome::Resolved(report),
            Ok(Ok(report)) => PollOutcome::Pending {
                status: report.status,
            },
            Ok(Err(e)) => PollOutcome::ConnectionError { reason: e.message },
            Err(_) => PollOutcome::ConnectionError {
                reason: format!(
                    "status query timed out after {}ms",
                    self.config.status_timeout_ms
                ),
            },
        }
    }
}
