//! Scripted collaborators that record when and how often they were called

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use optiroute_client::models::{JobHandle, JobStatusReport, UploadFile};
use optiroute_client::transport::{
    StatusCollaborator, TransportError, UploadCollaborator, UploadError, UploadReceipt,
};

/// One scripted status answer
#[derive(Debug, Clone)]
pub enum StatusStep {
    Report(JobStatusReport),
    Fail(String),
    /// Never answers
    Hang,
}

/// Status collaborator that plays back a script, then keeps answering `PENDING`
pub struct ScriptedStatus {
    script: Mutex<VecDeque<StatusStep>>,
    delay: Duration,
    calls: Mutex<Vec<(Instant, JobHandle)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedStatus {
    pub fn new(script: impl IntoIterator<Item = StatusStep>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn pending_forever() -> Self {
        Self::new(Vec::<StatusStep>::new())
    }

    pub fn reports(reports: impl IntoIterator<Item = JobStatusReport>) -> Self {
        Self::new(reports.into_iter().map(StatusStep::Report))
    }

    /// Make every query take `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().iter().map(|(at, _)| *at).collect()
    }

    pub fn queried_handles(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|(_, handle)| handle.id().to_string())
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusCollaborator for ScriptedStatus {
    async fn get_status(&self, handle: &JobHandle) -> Result<JobStatusReport, TransportError> {
        self.calls.lock().push((Instant::now(), handle.clone()));
        let step = self
            .script
            .lock()
            .pop_front()
            .unwrap_or(StatusStep::Report(JobStatusReport::pending()));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let answer = match step {
            StatusStep::Report(report) => Ok(report),
            StatusStep::Fail(message) => Err(TransportError::new(message)),
            StatusStep::Hang => std::future::pending().await,
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        answer
    }
}

/// Upload collaborator with a fixed answer
pub struct ScriptedUpload {
    answer: Result<UploadReceipt, UploadError>,
    delay: Duration,
    uploads: Mutex<Vec<String>>,
}

impl ScriptedUpload {
    pub fn accepting(job_id: &str) -> Self {
        Self::answering(Ok(UploadReceipt {
            job_id: job_id.to_string(),
        }))
    }

    pub fn answering(answer: Result<UploadReceipt, UploadError>) -> Self {
        Self {
            answer,
            delay: Duration::ZERO,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().len()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl UploadCollaborator for ScriptedUpload {
    async fn upload(&self, file: &UploadFile) -> Result<UploadReceipt, UploadError> {
        self.uploads.lock().push(file.name.clone());
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.answer.clone()
    }
}
