//! In-memory record store
//!
//! Backing store for development and integration tests. Mirrors the
//! behavior of a relational table with unique indexes on `phone` and
//! `confirmation_token`: validated saves re-check phone uniqueness and
//! attach field errors instead of failing hard, while the token index is
//! enforced on every save.

use async_trait::async_trait;
use chrono::Utc;
use constant_time_eq::constant_time_eq;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use confirm_core::domain::entities::user_record::UserRecord;
use confirm_core::errors::{ConfirmationError, DomainError, DomainResult};
use confirm_core::RecordStore;

/// Thread-safe in-memory implementation of [`RecordStore`]
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Persisted snapshot of a record, for assertions and reloads
    pub async fn get(&self, id: Uuid) -> Option<UserRecord> {
        self.records.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn save(&self, record: &mut UserRecord, validate: bool) -> DomainResult<bool> {
        let mut records = self.records.write().await;

        if validate {
            if let Some(phone) = &record.phone {
                let taken = records
                    .values()
                    .any(|other| other.id != record.id && other.phone.as_ref() == Some(phone));
                if taken {
                    tracing::debug!(
                        record_id = %record.id,
                        event = "phone_uniqueness_violation",
                        "Rejected save: phone already taken"
                    );
                    record.errors_mut().add("phone", ConfirmationError::Taken);
                    return Ok(false);
                }
            }
        }

        // The token column carries a unique index; a collision here is a
        // storage-level fault, not a user-correctable validation failure.
        if let Some(token) = &record.confirmation_token {
            let collision = records.values().any(|other| {
                other.id != record.id && other.confirmation_token.as_ref() == Some(token)
            });
            if collision {
                return Err(DomainError::Storage {
                    message: "confirmation token index collision".to_string(),
                });
            }
        }

        record.updated_at = Utc::now();
        record.mark_persisted();

        let mut snapshot = record.clone();
        snapshot.reset_transient();
        records.insert(snapshot.id, snapshot);
        Ok(true)
    }

    async fn find_by_token(&self, token: &str) -> DomainResult<Option<UserRecord>> {
        let records = self.records.read().await;
        // Constant-time comparison: token lookup is an authentication
        // decision, so match timing must not leak prefix information.
        Ok(records
            .values()
            .find(|record| match &record.confirmation_token {
                Some(stored) => {
                    stored.len() == token.len()
                        && constant_time_eq(stored.as_bytes(), token.as_bytes())
                }
                None => false,
            })
            .cloned())
    }

    async fn find_by_fields(
        &self,
        criteria: &[(String, String)],
    ) -> DomainResult<Option<UserRecord>> {
        if criteria.is_empty() {
            return Ok(None);
        }
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| {
                criteria
                    .iter()
                    .all(|(field, value)| record.field_value(field).as_deref() == Some(value.as_str()))
            })
            .cloned())
    }
}
