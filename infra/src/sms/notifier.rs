//! Queued SMS notifier
//!
//! Bridges the core's fire-and-forget delivery contract to an
//! [`SmsSender`]: `deliver` renders the instruction message and enqueues
//! it, and a background worker drains the queue. Transport failures are
//! logged and never surface to the caller.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use confirm_core::Notifier;
use confirm_shared::config::SmsConfig;
use confirm_shared::utils::phone::mask_phone;

use super::sender::SmsSender;

struct OutboundSms {
    destination: String,
    message: String,
}

/// Notifier that queues confirmation instructions for background delivery
pub struct QueuedSmsNotifier {
    queue: mpsc::UnboundedSender<OutboundSms>,
    worker: JoinHandle<()>,
    config: SmsConfig,
}

impl QueuedSmsNotifier {
    /// Start the delivery worker on the current runtime
    ///
    /// Accepts unsized senders, so the output of
    /// [`sender_from_config`](crate::sms::sender_from_config) can be
    /// passed directly.
    pub fn spawn<S>(sender: Arc<S>, config: SmsConfig) -> Self
    where
        S: SmsSender + ?Sized + 'static,
    {
        let (queue, mut inbox) = mpsc::unbounded_channel::<OutboundSms>();
        let provider = sender.provider_name().to_string();

        let worker = tokio::spawn(async move {
            while let Some(outbound) = inbox.recv().await {
                match sender.send_sms(&outbound.destination, &outbound.message).await {
                    Ok(message_id) => {
                        info!(
                            phone = %mask_phone(&outbound.destination),
                            message_id = %message_id,
                            event = "sms_delivered",
                            "Delivered confirmation instructions"
                        );
                    }
                    Err(err) => {
                        error!(
                            phone = %mask_phone(&outbound.destination),
                            error = %err,
                            event = "sms_delivery_failed",
                            "Failed to deliver confirmation instructions"
                        );
                    }
                }
            }
        });

        info!(provider = %provider, event = "sms_worker_started", "SMS delivery worker started");

        Self {
            queue,
            worker,
            config,
        }
    }

    /// Close the queue and wait for in-flight deliveries to finish
    pub async fn shutdown(self) {
        drop(self.queue);
        // Worker exits once the queue drains
        let _ = self.worker.await;
    }
}

#[async_trait]
impl Notifier for QueuedSmsNotifier {
    async fn deliver(&self, destination: &str, raw_token: &str) {
        let outbound = OutboundSms {
            destination: destination.to_string(),
            message: self.config.render_message(raw_token),
        };

        if self.queue.send(outbound).is_err() {
            error!(
                phone = %mask_phone(destination),
                event = "sms_queue_closed",
                "Dropped confirmation instructions: delivery queue closed"
            );
        }
    }
}
