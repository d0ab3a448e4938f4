//! SMS sender interface

use async_trait::async_trait;

use crate::InfraError;

/// SMS transport trait
///
/// Implementations are expected to validate the destination, deliver the
/// message, and return a provider-assigned message id.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send an SMS message to a phone number in E.164 format
    ///
    /// Returns the provider's unique identifier for the sent message.
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfraError>;

    /// Name of the transport provider (e.g. "mock")
    fn provider_name(&self) -> &str;

    /// Health check; default implementation reports available
    async fn is_available(&self) -> bool {
        true
    }
}
