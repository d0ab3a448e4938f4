//! SMS delivery implementations
//!
//! [`SmsSender`] is the transport seam; [`MockSmsSender`] is the
//! development implementation; [`QueuedSmsNotifier`] adapts a sender to
//! the core's fire-and-forget [`Notifier`](confirm_core::Notifier)
//! contract through a background delivery queue.

use std::sync::Arc;

use confirm_shared::config::SmsConfig;

use crate::InfraError;

mod mock_sms;
mod notifier;
mod sender;

pub use mock_sms::MockSmsSender;
pub use notifier::QueuedSmsNotifier;
pub use sender::SmsSender;

/// Build the transport named by `SmsConfig.provider`
///
/// "mock" is the only provider shipped here; real providers plug in as
/// further match arms.
pub fn sender_from_config(config: &SmsConfig) -> Result<Arc<dyn SmsSender>, InfraError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockSmsSender::from_config(config))),
        other => Err(InfraError::Sms(format!("unknown SMS provider: {other}"))),
    }
}
