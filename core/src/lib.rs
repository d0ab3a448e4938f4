//! # PhoneConfirm Core
//!
//! Core domain layer for the phone-number confirmation service. This crate
//! contains the confirmation manager, the reconfirmation guard, the user
//! record entity, collaborator traits, and error types. Persistence and
//! message transport are supplied by collaborators implementing the traits
//! defined here.

pub mod clock;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::entities::user_record::{SendState, UserRecord};
pub use errors::{ConfirmationError, DomainError, DomainResult, FieldErrors};
pub use repositories::RecordStore;
pub use services::confirmation::{
    ConfirmationConfig, ConfirmationHooks, ConfirmationManager, NoOpHooks, Notifier,
};
