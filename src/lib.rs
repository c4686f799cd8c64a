#![allow(clippy::doc_markdown)] // Allow technical terms like OptiRoute, JSON in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # OptiRoute Client
//!
//! Client-side job lifecycle for the OptiRoute route optimization backend.
//!
//! ## Overview
//!
//! A user submits a CSV file of delivery stops. The backend geocodes the
//! stops and computes an optimized visiting order asynchronously, so the
//! client uploads the file, receives a job handle, polls the job status every
//! two seconds until it is terminal, and turns the final payload into a
//! display-ready route.
//!
//! ## Module Organization
//!
//! - [`lifecycle`] - `JobClient` and the lifecycle state machine it publishes
//! - [`polling`] - Cancellable, non-overlapping status poller
//! - [`shaping`] - Validation and reshaping of the raw result payload
//! - [`transport`] - Upload/status collaborator traits and the HTTP backend
//! - [`models`] - Job, status, stop and route types
//! - [`config`] - Layered configuration (defaults, TOML file, environment)
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use optiroute_client::config::ClientConfig;
//! use optiroute_client::lifecycle::{JobClient, JobLifecycleState};
//! use optiroute_client::models::UploadFile;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! optiroute_client::logging::init_structured_logging();
//!
//! let client = JobClient::with_http_backend(ClientConfig::load()?)?;
//! let mut states = client.submit(UploadFile::from_path("stops.csv").await?);
//!
//! while let Some(state) = states.next().await {
//!     match state {
//!         JobLifecycleState::Resolved { display_model, .. } => {
//!             let summary = display_model.formatted_summary();
//!             println!("{} / {}", summary.duration, summary.distance);
//!             break;
//!         }
//!         JobLifecycleState::Failed { reason, .. } => {
//!             eprintln!("{reason}");
//!             break;
//!         }
//!         other => println!("{other}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod polling;
pub mod shaping;
pub mod transport;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, LifecycleError, ShapingError};
pub use lifecycle::{FailureKind, JobClient, JobLifecycleState, LifecycleStream};
pub use models::{DisplayModel, JobHandle, JobStatusReport, RawJobStatus, UploadFile};
pub use polling::{CancelToken, JobPoller, PollOutcome};
pub use shaping::{ResultShaper, ShapedResult};
pub use transport::{HttpBackend, StatusCollaborator, UploadCollaborator};
