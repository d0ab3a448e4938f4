//! # PhoneConfirm Shared
//!
//! Shared configuration types and utilities used by both the core domain
//! layer and the infrastructure layer.

pub mod config;
pub mod utils;

pub use config::{ConfirmationSettings, SmsConfig};
