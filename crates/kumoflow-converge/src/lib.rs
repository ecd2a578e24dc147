//! Bounded status polling for KumoFlow
//!
//! The remote control plane executes mutations in the background and
//! exposes progress only through a polled status field. This crate provides
//! the single polling primitive every resource crate builds on: wait until
//! the status enters a target set, leaves the expected pending set, or a
//! timeout fires — at a bounded request rate, cancellable at any point.

pub mod error;
pub mod poller;
pub mod timing;

// Re-exports
pub use error::{ConvergeError, Result};
pub use poller::{PollOutcome, StatusExpectation, converge, wait_for_existence, wait_for_status};
pub use timing::WaitTiming;
