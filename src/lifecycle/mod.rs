//! # Job Lifecycle
//!
//! The state machine a submission moves through and the client that drives it.
//!
//! ```text
//! Idle -> Submitting -> Polling -> Resolved
//!              |            \
//!              +-> Failed <--+
//! ```
//!
//! `Reset` returns to `Idle` from any state. `Resolved` and `Failed` are only
//! left through a reset.

mod client;
mod state;

pub use client::{JobClient, LifecycleStream};
pub use state::{FailureKind, JobLifecycleState, LifecycleEvent};
