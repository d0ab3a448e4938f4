//! Mock SMS sender
//!
//! Development and test transport: logs messages instead of sending them,
//! validates destinations, and tracks a delivery counter.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use confirm_shared::config::SmsConfig;
use confirm_shared::utils::phone::{is_valid_phone_number, mask_phone};

use super::sender::SmsSender;
use crate::InfraError;

/// Mock SMS sender for development and testing
///
/// This implementation:
/// - Logs messages instead of delivering them
/// - Validates phone numbers
/// - Generates mock message ids
/// - Tracks sent messages for test assertions
#[derive(Clone, Default)]
pub struct MockSmsSender {
    from_number: String,
    message_count: Arc<AtomicU64>,
    sent: Arc<Mutex<Vec<(String, String)>>>,
    simulate_failure: Arc<std::sync::atomic::AtomicBool>,
}

impl MockSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sender carrying the configured sender number
    pub fn from_config(config: &SmsConfig) -> Self {
        Self {
            from_number: config.from_number.clone(),
            ..Self::default()
        }
    }

    /// Configured sender number or alphanumeric sender id
    pub fn from_number(&self) -> &str {
        &self.from_number
    }

    /// Total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Every (destination, message) pair sent so far
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("sent lock poisoned").clone()
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

#[async_trait]
impl SmsSender for MockSmsSender {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfraError> {
        if !is_valid_phone_number(phone_number) {
            return Err(InfraError::Sms(format!(
                "invalid phone number format: {}",
                mask_phone(phone_number)
            )));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                phone = %mask_phone(phone_number),
                event = "sms_send_failed",
                "Mock SMS sender simulating failure"
            );
            return Err(InfraError::Sms("simulated SMS sending failure".to_string()));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .push((phone_number.to_string(), message.to_string()));

        info!(
            target: "sms",
            provider = "mock",
            from = %self.from_number,
            phone = %mask_phone(phone_number),
            message_id = %message_id,
            message_length = message.len(),
            count,
            "SMS sent (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure.load(Ordering::SeqCst)
    }
}
