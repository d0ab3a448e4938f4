//! Reconfirmation guard: postpones phone-number changes until confirmed
//!
//! The guard runs pre-save inside the manager's `update_phone` entry point
//! and the notification step runs post-save-success, regardless of the
//! backing store. There is no lifecycle-callback machinery; every trigger
//! is an explicit call.

use confirm_shared::utils::phone::mask_phone;

use crate::clock::Clock;
use crate::domain::entities::user_record::{SendState, UserRecord};
use crate::errors::DomainResult;
use crate::repositories::RecordStore;

use super::manager::ConfirmationManager;
use super::traits::{ConfirmationHooks, Notifier};

impl<S, N, C, H> ConfirmationManager<S, N, C, H>
where
    S: RecordStore,
    N: Notifier,
    C: Clock,
    H: ConfirmationHooks,
{
    /// Apply a phone-number mutation through the reconfirmation guard
    ///
    /// When the guard activates, the stored phone keeps its prior value,
    /// the incoming number is parked in `unconfirmed_phone`, and a fresh
    /// token is raised; once the save commits, instructions go out to the
    /// new number. When the guard is off (or bypassed), the change applies
    /// directly. One-shot flags are reset on every exit.
    pub async fn update_phone(&self, record: &mut UserRecord, new_phone: &str) -> DomainResult<bool> {
        record.errors_mut().clear();

        if self.should_postpone(record, new_phone) {
            self.postpone_phone_change(record, new_phone);
        } else {
            record.phone = Some(new_phone.to_string());
        }

        let saved = self.store.save(record, true).await?;

        if saved {
            self.notify_after_commit(record).await?;
        }

        // Deterministic one-shot reset, also on failed saves
        record.state.send_state = SendState::Normal;
        record.state.bypass_reconfirmation = false;

        Ok(saved)
    }

    /// Guard activation predicate
    ///
    /// Activates only for a reconfirmable, actually-changing, non-empty
    /// phone value with no bypass in effect; a freshly created record only
    /// triggers the guard when its previous phone was absent or no
    /// notification suppression is pending.
    fn should_postpone(&self, record: &UserRecord, new_phone: &str) -> bool {
        self.config().reconfirmable
            && record.phone.as_deref() != Some(new_phone)
            && !record.state.bypass_reconfirmation
            && !new_phone.is_empty()
            && (record.is_persisted()
                || !(record.state.send_state == SendState::NotificationSuppressed
                    && record.phone.is_some()))
    }

    /// Park the incoming number and raise a fresh token
    ///
    /// The outstanding token is cleared first so the regeneration below
    /// cannot reuse it: a reconfirmation cycle always gets its own token.
    fn postpone_phone_change(&self, record: &mut UserRecord, new_phone: &str) {
        tracing::info!(
            record_id = %record.id,
            phone = %mask_phone(new_phone),
            event = "phone_change_postponed",
            "Postponing phone change until confirmed"
        );

        record.unconfirmed_phone = Some(new_phone.to_string());
        record.confirmation_token = None;
        record.state.raw_token = None;
        self.generate_token(record);

        if record.state.send_state != SendState::NotificationSuppressed {
            record.state.send_state = SendState::PendingReconfirmSend;
        }
    }

    /// Fire the pending reconfirmation send after a committed mutation
    async fn notify_after_commit(&self, record: &mut UserRecord) -> DomainResult<()> {
        if record.state.send_state == SendState::PendingReconfirmSend {
            self.send_confirmation_instructions(record).await?;
        }
        Ok(())
    }
}
