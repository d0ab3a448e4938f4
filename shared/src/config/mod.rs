//! Application configuration structures.

mod confirmation;
mod sms;

pub use confirmation::ConfirmationSettings;
pub use sms::SmsConfig;
