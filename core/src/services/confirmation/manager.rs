//! Confirmation manager implementation

use chrono::Duration;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use std::collections::HashMap;
use std::sync::Arc;

use confirm_shared::utils::phone::mask_phone;

use crate::clock::{Clock, SystemClock};
use crate::domain::entities::user_record::{SendState, UserRecord};
use crate::errors::{ConfirmationError, DomainResult};
use crate::repositories::RecordStore;

use super::config::ConfirmationConfig;
use super::traits::{ConfirmationHooks, NoOpHooks, Notifier};

/// Length of a minted confirmation token
pub const TOKEN_LENGTH: usize = 20;

/// Confirmation manager driving the token lifecycle and confirmation
/// state machine over records supplied by the persistence collaborator
///
/// All state lives on the record instance and its persisted columns; the
/// manager itself holds only immutable configuration and collaborators,
/// so a single instance can serve concurrent callers.
pub struct ConfirmationManager<S, N, C = SystemClock, H = NoOpHooks>
where
    S: RecordStore,
    N: Notifier,
    C: Clock,
    H: ConfirmationHooks,
{
    /// Record store for persistence operations
    pub(super) store: Arc<S>,
    /// Notifier for instruction delivery
    pub(super) notifier: Arc<N>,
    /// Time source for stamping and window checks
    pub(super) clock: C,
    /// Post-confirmation extension hook
    pub(super) hooks: H,
    /// Manager configuration
    pub(super) config: ConfirmationConfig,
}

impl<S, N> ConfirmationManager<S, N>
where
    S: RecordStore,
    N: Notifier,
{
    /// Create a new confirmation manager using the system clock
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: ConfirmationConfig) -> Self {
        Self {
            store,
            notifier,
            clock: SystemClock,
            hooks: NoOpHooks,
            config,
        }
    }
}

impl<S, N, C> ConfirmationManager<S, N, C>
where
    S: RecordStore,
    N: Notifier,
    C: Clock,
{
    /// Create a manager with an injected clock (deterministic tests)
    pub fn with_clock(store: Arc<S>, notifier: Arc<N>, config: ConfirmationConfig, clock: C) -> Self {
        Self {
            store,
            notifier,
            clock,
            hooks: NoOpHooks,
            config,
        }
    }
}

impl<S, N, C, H> ConfirmationManager<S, N, C, H>
where
    S: RecordStore,
    N: Notifier,
    C: Clock,
    H: ConfirmationHooks,
{
    /// Create a manager with an injected clock and confirmation hooks
    pub fn with_clock_and_hooks(
        store: Arc<S>,
        notifier: Arc<N>,
        config: ConfirmationConfig,
        clock: C,
        hooks: H,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            hooks,
            config,
        }
    }

    pub fn config(&self) -> &ConfirmationConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Token lifecycle
    // ---------------------------------------------------------------

    /// Issue a confirmation token, reusing an unexpired outstanding one
    ///
    /// Reuse prevents invalidating a token the user may already have
    /// received when a repeat request arrives. A fresh token stamps
    /// `confirmation_sent_at` with the current time. Returns `true` when
    /// a new token was minted.
    pub fn generate_token(&self, record: &mut UserRecord) -> bool {
        if record.confirmation_token.is_some() && !self.is_token_expired(record) {
            record.state.raw_token = record.confirmation_token.clone();
            return false;
        }

        let raw = Self::mint_token();
        record.state.raw_token = Some(raw.clone());
        record.confirmation_token = Some(raw);
        record.confirmation_sent_at = Some(self.clock.now());

        tracing::info!(
            record_id = %record.id,
            event = "confirmation_token_generated",
            "Generated new confirmation token"
        );
        true
    }

    /// Mint a cryptographically unguessable token
    ///
    /// Uses the OS CSPRNG. Twenty alphanumeric characters give far more
    /// entropy than needed for collision resistance across records; the
    /// store additionally enforces uniqueness.
    pub fn mint_token() -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    // ---------------------------------------------------------------
    // Confirmation
    // ---------------------------------------------------------------

    /// Redeem the outstanding token and transition the record to confirmed
    ///
    /// Fails with an `AlreadyConfirmed` field error on a fully settled
    /// record and with `TokenExpired` when the validity window elapsed.
    /// A pending phone change is applied atomically with the confirmation
    /// and persisted with full validation; otherwise only timestamp fields
    /// changed and validation is skipped.
    pub async fn confirm(&self, record: &mut UserRecord) -> DomainResult<bool> {
        self.confirm_inner(record, false).await
    }

    /// Like [`confirm`](Self::confirm), but runs full validation on the
    /// save even when no phone change is pending
    pub async fn confirm_ensuring_valid(&self, record: &mut UserRecord) -> DomainResult<bool> {
        self.confirm_inner(record, true).await
    }

    async fn confirm_inner(&self, record: &mut UserRecord, ensure_valid: bool) -> DomainResult<bool> {
        record.errors_mut().clear();
        let pending = self.pending_reconfirmation(record);

        if record.is_confirmed() && !pending {
            tracing::warn!(
                record_id = %record.id,
                event = "already_confirmed",
                "Confirmation attempted on a settled record"
            );
            record
                .errors_mut()
                .add("phone", ConfirmationError::AlreadyConfirmed);
            return Ok(false);
        }

        if self.is_token_expired(record) {
            let window = self.config.confirm_within.unwrap_or_else(Duration::zero);
            tracing::warn!(
                record_id = %record.id,
                event = "confirmation_token_expired",
                "Confirmation attempted after the validity window elapsed"
            );
            record
                .errors_mut()
                .add("confirmation_token", ConfirmationError::TokenExpired { window });
            return Ok(false);
        }

        record.confirmed_at = Some(self.clock.now());

        let saved = if pending {
            // The phone value itself changes, so uniqueness must be
            // re-checked by the store.
            record.state.bypass_reconfirmation = true;
            record.phone = record.unconfirmed_phone.take();
            self.store.save(record, true).await?
        } else {
            self.store.save(record, ensure_valid).await?
        };
        record.state.bypass_reconfirmation = false;

        if saved {
            tracing::info!(
                record_id = %record.id,
                event = "record_confirmed",
                reconfirmation = pending,
                "Record confirmed"
            );
            self.hooks.on_confirmed(record);
        }

        Ok(saved)
    }

    // ---------------------------------------------------------------
    // Instruction delivery
    // ---------------------------------------------------------------

    /// Send confirmation instructions to the record's phone
    ///
    /// Ensures a raw token is available (issuing one if needed and
    /// persisting it for already-persisted records), then delegates to the
    /// notifier. Delivery is fire-and-forget: transport failures are the
    /// notifier's concern and never surface as a confirmation error.
    pub async fn send_confirmation_instructions(&self, record: &mut UserRecord) -> DomainResult<bool> {
        if record.state.raw_token.is_none() {
            let minted = self.generate_token(record);
            if minted && record.is_persisted() {
                // Only timestamp and token columns changed
                self.store.save(record, false).await?;
            }
        }

        let destination = match record
            .unconfirmed_phone
            .clone()
            .or_else(|| record.phone.clone())
        {
            Some(destination) => destination,
            None => {
                record.errors_mut().add("phone", ConfirmationError::Required);
                return Ok(false);
            }
        };

        if let Some(raw) = record.state.raw_token.clone() {
            tracing::info!(
                record_id = %record.id,
                phone = %mask_phone(&destination),
                event = "confirmation_instructions_sent",
                "Dispatching confirmation instructions"
            );
            self.notifier.deliver(&destination, &raw).await;
        }

        Ok(true)
    }

    /// Re-send confirmation instructions for a still-pending record
    ///
    /// Guarded by the same already-confirmed policy as `confirm`; an
    /// expired token is regenerated before sending.
    pub async fn resend_confirmation_instructions(&self, record: &mut UserRecord) -> DomainResult<bool> {
        record.errors_mut().clear();

        if record.is_confirmed() && !self.pending_reconfirmation(record) {
            record
                .errors_mut()
                .add("phone", ConfirmationError::AlreadyConfirmed);
            return Ok(false);
        }

        self.send_confirmation_instructions(record).await
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Whether the record still needs to confirm
    pub fn confirmation_required(&self, record: &UserRecord) -> bool {
        !record.is_confirmed()
    }

    /// Whether a reconfirmable phone change is awaiting confirmation
    pub fn pending_reconfirmation(&self, record: &UserRecord) -> bool {
        self.config.reconfirmable && record.unconfirmed_phone.is_some()
    }

    /// Whether the record may authenticate: confirmed, or still within the
    /// unconfirmed-access grace window
    pub fn is_eligible_for_authentication(&self, record: &UserRecord) -> bool {
        !self.confirmation_required(record)
            || record.is_confirmed()
            || self.confirmation_period_valid(record)
    }

    /// Grace-window check, measured from `confirmation_sent_at`
    ///
    /// A `None` allowance means no restriction. A record that was never
    /// sent instructions cannot be in grace. The boundary favors expiry:
    /// elapsed time equal to the allowance is already outside the window.
    fn confirmation_period_valid(&self, record: &UserRecord) -> bool {
        match self.config.allow_unconfirmed_access_for {
            None => true,
            Some(allowance) => match record.confirmation_sent_at {
                None => false,
                Some(sent_at) => self.clock.now() - sent_at < allowance,
            },
        }
    }

    /// Whether the outstanding token's validity window has elapsed
    ///
    /// Never expires when `confirm_within` is unset or no token was ever
    /// sent. A token redeemed exactly at the window boundary still counts.
    pub fn is_token_expired(&self, record: &UserRecord) -> bool {
        match (self.config.confirm_within, record.confirmation_sent_at) {
            (Some(window), Some(sent_at)) => self.clock.now() > sent_at + window,
            _ => false,
        }
    }

    // ---------------------------------------------------------------
    // Flow bypasses (one-shot)
    // ---------------------------------------------------------------

    /// Mark the record confirmed immediately, without a token
    pub fn skip_confirmation(&self, record: &mut UserRecord) {
        record.confirmed_at = Some(self.clock.now());
    }

    /// Suppress the next instruction send (one-shot)
    pub fn skip_confirmation_notification(&self, record: &mut UserRecord) {
        record.state.send_state = SendState::NotificationSuppressed;
    }

    /// Let the next phone mutation apply directly, without reconfirmation
    /// (one-shot)
    pub fn skip_reconfirmation(&self, record: &mut UserRecord) {
        record.state.bypass_reconfirmation = true;
    }

    // ---------------------------------------------------------------
    // Orchestration entry points
    // ---------------------------------------------------------------

    /// Create a record: issue a token pre-save, then send instructions
    /// once the save has committed (unless suppressed)
    ///
    /// Returns the record in all cases; on a failed save the field errors
    /// are attached and the record remains transient.
    pub async fn create(&self, mut record: UserRecord) -> DomainResult<UserRecord> {
        if !record.is_confirmed() && record.confirmation_token.is_none() {
            self.generate_token(&mut record);
        }

        let saved = self.store.save(&mut record, true).await?;

        if saved && !record.is_confirmed() {
            match record.state.send_state {
                SendState::NotificationSuppressed => {
                    record.state.send_state = SendState::Normal;
                }
                _ => {
                    self.send_confirmation_instructions(&mut record).await?;
                }
            }
        }

        Ok(record)
    }

    // ---------------------------------------------------------------
    // Class-level lookups
    // ---------------------------------------------------------------

    /// Locate a record for a resend request, or build a transient record
    /// carrying a not-found error
    ///
    /// In reconfirmable mode the `phone` attribute is first remapped to
    /// `unconfirmed_phone`, so a user mid-change can request a resend with
    /// the number they just typed. Persisted hits trigger the resend.
    pub async fn find_or_initialize_for_resend(
        &self,
        attributes: &HashMap<String, String>,
    ) -> DomainResult<UserRecord> {
        if self.config.reconfirmable {
            let remapped: Vec<(String, String)> = attributes
                .iter()
                .map(|(field, value)| {
                    let field = if field == "phone" {
                        "unconfirmed_phone".to_string()
                    } else {
                        field.clone()
                    };
                    (field, value.clone())
                })
                .collect();

            if let Some(mut record) = self.store.find_by_fields(&remapped).await? {
                if record.is_persisted() {
                    self.resend_confirmation_instructions(&mut record).await?;
                    return Ok(record);
                }
            }
        }

        let criteria: Vec<(String, String)> = self
            .config
            .confirmation_lookup_keys
            .iter()
            .filter_map(|key| attributes.get(key).map(|value| (key.clone(), value.clone())))
            .collect();

        match self.store.find_by_fields(&criteria).await? {
            Some(mut record) => {
                if record.is_persisted() {
                    self.resend_confirmation_instructions(&mut record).await?;
                }
                Ok(record)
            }
            None => {
                let mut record = UserRecord::new();
                for (field, value) in attributes {
                    record.apply_attribute(field, value);
                }
                let field = self
                    .config
                    .confirmation_lookup_keys
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "phone".to_string());
                record.errors_mut().add(field, ConfirmationError::NotFound);
                Ok(record)
            }
        }
    }

    /// Confirm the record holding the given token, or return a transient
    /// record carrying a not-found token error
    pub async fn confirm_by_token(&self, token: &str) -> DomainResult<UserRecord> {
        match self.store.find_by_token(token).await? {
            Some(mut record) => {
                self.confirm(&mut record).await?;
                Ok(record)
            }
            None => {
                tracing::warn!(
                    event = "confirmation_token_not_found",
                    "Confirmation attempted with an unknown token"
                );
                let mut record = UserRecord::new();
                record
                    .errors_mut()
                    .add("confirmation_token", ConfirmationError::NotFound);
                Ok(record)
            }
        }
    }
}
