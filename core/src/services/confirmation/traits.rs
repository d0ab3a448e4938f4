//! Collaborator traits for notification delivery and extension hooks

use async_trait::async_trait;

use crate::domain::entities::user_record::UserRecord;

/// Notification transport collaborator
///
/// Delivery is fire-and-forget from the manager's perspective: no return
/// value is consumed, and implementations own their logging and retry
/// policy. Implementations are expected to hand the message to an
/// asynchronous worker and return immediately.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the raw confirmation token to the destination phone
    async fn deliver(&self, destination: &str, raw_token: &str);
}

/// Extension hook invoked after confirmation side effects
pub trait ConfirmationHooks: Send + Sync {
    /// Called once per successful confirmation, after the record has been
    /// persisted. Default is a no-op.
    fn on_confirmed(&self, _record: &UserRecord) {}
}

/// Default hook implementation that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHooks;

impl ConfirmationHooks for NoOpHooks {}
