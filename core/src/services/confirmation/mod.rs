//! Confirmation service module
//!
//! This module provides the complete phone-confirmation workflow:
//! - Idempotent confirmation-token issuance
//! - Token redemption with expiry and already-confirmed policy
//! - Instruction delivery through a notifier collaborator
//! - Reconfirmation of in-flight phone-number changes
//! - Authentication-eligibility queries with a grace window

mod config;
mod guard;
mod manager;
mod traits;

#[cfg(test)]
mod tests;

pub use config::ConfirmationConfig;
pub use manager::{ConfirmationManager, TOKEN_LENGTH};
pub use traits::{ConfirmationHooks, NoOpHooks, Notifier};
