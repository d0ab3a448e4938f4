//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator traits the confirmation
//! core depends on:
//!
//! - **Store**: in-memory [`RecordStore`](confirm_core::RecordStore)
//!   backing development and tests
//! - **SMS**: SMS sender abstraction, a mock sender, and a queued
//!   notifier bridging the core's fire-and-forget delivery contract to a
//!   background worker

/// Record storage implementations
pub mod store;

/// SMS delivery implementations
pub mod sms;

pub use sms::{MockSmsSender, QueuedSmsNotifier, SmsSender};
pub use store::InMemoryRecordStore;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    /// SMS transport error
    #[error("SMS service error: {0}")]
    Sms(String),
}
