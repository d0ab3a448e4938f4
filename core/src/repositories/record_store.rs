//! Record store trait defining the persistence collaborator contract.
//!
//! The confirmation manager reads and writes record fields but never owns
//! storage; implementations handle the actual persistence while keeping
//! validation failures recoverable (field errors on the record, `Ok(false)`
//! from `save`) rather than fatal.

use async_trait::async_trait;

use crate::domain::entities::user_record::UserRecord;
use crate::errors::DomainResult;

/// Persistence contract for user records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist the record, optionally running full validation
    ///
    /// With `validate` set, uniqueness of the phone number must be checked
    /// (the confirmation flow re-validates whenever the phone value itself
    /// changes). A validation failure attaches field errors to the record
    /// and returns `Ok(false)`; `Err` is reserved for storage faults.
    ///
    /// On success the record is marked persisted.
    async fn save(&self, record: &mut UserRecord, validate: bool) -> DomainResult<bool>;

    /// Find a record by exact confirmation-token match
    async fn find_by_token(&self, token: &str) -> DomainResult<Option<UserRecord>>;

    /// Find a record where every `(field, value)` pair matches
    ///
    /// Empty criteria match nothing and return `Ok(None)`, so a
    /// misconfigured lookup-key set degrades to the not-found path.
    async fn find_by_fields(&self, criteria: &[(String, String)]) -> DomainResult<Option<UserRecord>>;
}
