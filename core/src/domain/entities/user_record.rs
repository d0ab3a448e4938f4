//! User record entity carrying the confirmation state.
//!
//! The record is owned by the persistence collaborator; the confirmation
//! manager mutates its fields but never owns storage. Alongside the
//! persisted columns it carries transient per-instance state (the raw
//! token and the one-shot send flags) and the field-attached error
//! collection, neither of which is serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FieldErrors;

/// One-shot state controlling the next notification cycle
///
/// Replaces the ad-hoc booleans a callback-driven implementation would
/// toggle across methods; reset to `Normal` at well-defined points by the
/// manager's orchestration entry points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendState {
    /// No pending notification work
    #[default]
    Normal,
    /// A postponed phone change committed; instructions fire post-save
    PendingReconfirmSend,
    /// The next instruction send is suppressed (one-shot)
    NotificationSuppressed,
}

/// Transient per-instance confirmation state, never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransientState {
    /// Plaintext token held in memory after generation. The stored token
    /// is kept verbatim here, but a hashing store could diverge from it
    /// without the manager noticing.
    pub raw_token: Option<String>,
    /// One-shot notification state
    pub send_state: SendState,
    /// One-shot guard bypass: the next phone mutation applies directly
    pub bypass_reconfirmation: bool,
}

/// User record with phone-confirmation fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Current confirmed phone number
    pub phone: Option<String>,

    /// Pending new phone number awaiting confirmation; present only when
    /// reconfirmable mode is enabled and a change is pending
    pub unconfirmed_phone: Option<String>,

    /// Current outstanding confirmation token, unique across records
    pub confirmation_token: Option<String>,

    /// Set once per confirmation event; `Some` means confirmed
    pub confirmed_at: Option<DateTime<Utc>>,

    /// Generation time of the current token
    pub confirmation_sent_at: Option<DateTime<Utc>>,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the record was last updated
    pub updated_at: DateTime<Utc>,

    /// Whether the record has been persisted by the store
    #[serde(default)]
    persisted: bool,

    /// Field-attached errors from the last failed operation
    #[serde(skip)]
    errors: FieldErrors,

    /// Transient confirmation state
    #[serde(skip)]
    pub(crate) state: TransientState,
}

impl UserRecord {
    /// Creates a new transient (non-persisted) record
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone: None,
            unconfirmed_phone: None,
            confirmation_token: None,
            confirmed_at: None,
            confirmation_sent_at: None,
            created_at: now,
            updated_at: now,
            persisted: false,
            errors: FieldErrors::default(),
            state: TransientState::default(),
        }
    }

    /// Creates a new transient record with a phone number
    pub fn with_phone(phone: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.phone = Some(phone.into());
        record
    }

    /// Whether the record has been saved by the persistence collaborator
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Marks the record as persisted; called by stores after a save
    pub fn mark_persisted(&mut self) {
        self.persisted = true;
    }

    /// Whether the record has ever been confirmed
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }

    /// Field-attached errors from the last failed operation
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }

    /// The raw token cached in memory after generation, if any
    pub fn raw_token(&self) -> Option<&str> {
        self.state.raw_token.as_deref()
    }

    /// Current one-shot notification state
    pub fn send_state(&self) -> SendState {
        self.state.send_state
    }

    /// Clears transient state and errors. Stores call this on persisted
    /// snapshots so instance-only state never round-trips through storage.
    pub fn reset_transient(&mut self) {
        self.state = TransientState::default();
        self.errors.clear();
    }

    /// Value of a lookup field by name, used by equality-based store queries
    pub fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "phone" => self.phone.clone(),
            "unconfirmed_phone" => self.unconfirmed_phone.clone(),
            "confirmation_token" => self.confirmation_token.clone(),
            _ => None,
        }
    }

    /// Applies a named attribute to the record, ignoring unknown fields.
    /// Used when materializing a transient record from lookup attributes.
    pub fn apply_attribute(&mut self, field: &str, value: &str) {
        match field {
            "phone" => self.phone = Some(value.to_string()),
            "unconfirmed_phone" => self.unconfirmed_phone = Some(value.to_string()),
            _ => {}
        }
    }
}

impl Default for UserRecord {
    fn default() -> Self {
        Self::new()
    }
}
