//! Business services containing domain logic.

pub mod confirmation;

// Re-export commonly used types
pub use confirmation::{
    ConfirmationConfig, ConfirmationHooks, ConfirmationManager, NoOpHooks, Notifier,
};
