use std::sync::Arc;
use tokio::sync::watch;

use crate::models::JobHandle;

/// Why a poller stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Resolved,
    ConnectionError,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerPhase {
    Active,
    Stopped(StopReason),
}

impl PollerPhase {
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }
}

/// Shared stop flag for one poll sequence.
///
/// The first transition out of `Active` wins; every later attempt is a
/// no-op, which is what lets a late query result be discarded after cancel.
#[derive(Debug, Clone)]
pub struct CancelToken {
    handle: JobHandle,
    phase: Arc<watch::Sender<PollerPhase>>,
}

impl CancelToken {
    pub(crate) fn new(handle: JobHandle) -> Self {
        let (phase, _) = watch::channel(PollerPhase::Active);
        Self {
            handle,
            phase: Arc::new(phase),
        }
    }

    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    pub fn phase(&self) -> PollerPhase {
        *self.phase.borrow()
    }

    pub fn is_stopped(&self) -> bool {
        self.phase().is_stopped()
    }

    /// Stop the poller. Returns `false` when it had already stopped.
    pub fn cancel(&self) -> bool {
        self.stop(StopReason::Cancelled)
    }

    /// Wait until the poller stops for any reason
    pub async fn stopped(&self) -> StopReason {
        let mut rx = self.phase.subscribe();
        let result = rx.wait_for(PollerPhase::is_stopped).await.map(|phase| *phase);
        match result {
            Ok(PollerPhase::Stopped(reason)) => reason,
            // The sender lives as long as this token, so the channel cannot close here
            _ => StopReason::Cancelled,
        }
    }

    /// Convert into a guard that cancels when dropped
    pub fn into_guard(self) -> PollGuard {
        PollGuard { token: self }
    }

    pub(crate) fn stop(&self, reason: StopReason) -> bool {
        self.phase.send_if_modified(|phase| {
            if *phase == PollerPhase::Active {
                *phase = PollerPhase::Stopped(reason);
                true
            } else {
                false
            }
        })
    }
}

/// Owns a running poll sequence; dropping it cancels the poller
#[derive(Debug)]
pub struct PollGuard {
    token: CancelToken,
}

impl PollGuard {
    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
