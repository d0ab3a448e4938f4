//! Unit tests for the reconfirmation guard

use chrono::{TimeZone, Utc};
use std::sync::Arc;

use crate::clock::FixedClock;
use crate::domain::entities::user_record::{SendState, UserRecord};
use crate::errors::ConfirmationError;
use crate::services::confirmation::{ConfirmationConfig, ConfirmationManager};

use super::mocks::{MockNotifier, MockRecordStore};

type TestManager = ConfirmationManager<MockRecordStore, MockNotifier, Arc<FixedClock>>;

fn setup(
    config: ConfirmationConfig,
) -> (
    Arc<MockRecordStore>,
    Arc<MockNotifier>,
    Arc<FixedClock>,
    TestManager,
) {
    let store = Arc::new(MockRecordStore::new());
    let notifier = Arc::new(MockNotifier::new());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
    ));
    let manager =
        ConfirmationManager::with_clock(store.clone(), notifier.clone(), config, clock.clone());
    (store, notifier, clock, manager)
}

/// A confirmed, persisted record with the given phone
async fn confirmed_record(manager: &TestManager, phone: &str) -> UserRecord {
    let mut record = manager
        .create(UserRecord::with_phone(phone))
        .await
        .unwrap();
    assert!(manager.confirm(&mut record).await.unwrap());
    record
}

#[tokio::test]
async fn test_reconfirmation_round_trip() {
    let (store, notifier, _clock, manager) = setup(ConfirmationConfig::default());

    let mut record = confirmed_record(&manager, "+14155550123").await;
    let old_token = record.confirmation_token.clone();

    // Phone change is postponed: stored value stays, change is parked
    assert!(manager.update_phone(&mut record, "+14155550999").await.unwrap());
    assert_eq!(record.phone.as_deref(), Some("+14155550123"));
    assert_eq!(record.unconfirmed_phone.as_deref(), Some("+14155550999"));
    assert!(record.confirmation_token.is_some());
    assert_ne!(record.confirmation_token, old_token);
    assert!(manager.pending_reconfirmation(&record));

    // Instructions went to the new number with the fresh token
    let fresh_token = record.confirmation_token.clone().unwrap();
    assert_eq!(
        notifier.last_token_for("+14155550999"),
        Some(fresh_token.clone())
    );

    // Confirming swaps the number in and keeps the record confirmed
    let mut reloaded = store.get(record.id).unwrap();
    assert!(manager.confirm(&mut reloaded).await.unwrap());
    assert_eq!(reloaded.phone.as_deref(), Some("+14155550999"));
    assert!(reloaded.unconfirmed_phone.is_none());
    assert!(reloaded.is_confirmed());

    let snapshot = store.get(record.id).unwrap();
    assert_eq!(snapshot.phone.as_deref(), Some("+14155550999"));
    assert!(snapshot.unconfirmed_phone.is_none());
}

#[tokio::test]
async fn test_guard_inactive_when_not_reconfirmable() {
    let config = ConfirmationConfig {
        reconfirmable: false,
        ..Default::default()
    };
    let (store, _notifier, _clock, manager) = setup(config);

    let mut record = confirmed_record(&manager, "+14155550123").await;
    let token_before = record.confirmation_token.clone();

    assert!(manager.update_phone(&mut record, "+14155550999").await.unwrap());
    assert_eq!(record.phone.as_deref(), Some("+14155550999"));
    assert!(record.unconfirmed_phone.is_none());
    assert_eq!(record.confirmation_token, token_before);

    let snapshot = store.get(record.id).unwrap();
    assert_eq!(snapshot.phone.as_deref(), Some("+14155550999"));
}

#[tokio::test]
async fn test_guard_bypassed_by_skip_reconfirmation() {
    let (_store, notifier, _clock, manager) = setup(ConfirmationConfig::default());

    let mut record = confirmed_record(&manager, "+14155550123").await;
    let sent_before = notifier.delivery_count();

    manager.skip_reconfirmation(&mut record);
    assert!(manager.update_phone(&mut record, "+14155550999").await.unwrap());
    assert_eq!(record.phone.as_deref(), Some("+14155550999"));
    assert!(record.unconfirmed_phone.is_none());
    assert_eq!(notifier.delivery_count(), sent_before);

    // Bypass is one-shot: the next change is postponed again
    assert!(manager.update_phone(&mut record, "+14155550888").await.unwrap());
    assert_eq!(record.phone.as_deref(), Some("+14155550999"));
    assert_eq!(record.unconfirmed_phone.as_deref(), Some("+14155550888"));
}

#[tokio::test]
async fn test_guard_ignores_empty_phone() {
    let (_store, _notifier, _clock, manager) = setup(ConfirmationConfig::default());

    let mut record = confirmed_record(&manager, "+14155550123").await;
    assert!(manager.update_phone(&mut record, "").await.unwrap());
    assert_eq!(record.phone.as_deref(), Some(""));
    assert!(record.unconfirmed_phone.is_none());
}

#[tokio::test]
async fn test_guard_ignores_unchanged_phone() {
    let (_store, notifier, _clock, manager) = setup(ConfirmationConfig::default());

    let mut record = confirmed_record(&manager, "+14155550123").await;
    let token_before = record.confirmation_token.clone();
    let sent_before = notifier.delivery_count();

    assert!(manager.update_phone(&mut record, "+14155550123").await.unwrap());
    assert!(record.unconfirmed_phone.is_none());
    assert_eq!(record.confirmation_token, token_before);
    assert_eq!(notifier.delivery_count(), sent_before);
}

#[tokio::test]
async fn test_postponed_change_with_suppressed_notification() {
    let (_store, notifier, _clock, manager) = setup(ConfirmationConfig::default());

    let mut record = confirmed_record(&manager, "+14155550123").await;
    let sent_before = notifier.delivery_count();

    manager.skip_confirmation_notification(&mut record);
    assert!(manager.update_phone(&mut record, "+14155550999").await.unwrap());

    // Change is still postponed, but nothing was delivered
    assert_eq!(record.unconfirmed_phone.as_deref(), Some("+14155550999"));
    assert_eq!(notifier.delivery_count(), sent_before);
    // Flags were reset after the commit
    assert_eq!(record.send_state(), SendState::Normal);
}

#[tokio::test]
async fn test_one_shot_flag_resets_after_firing() {
    let (_store, notifier, _clock, manager) = setup(ConfirmationConfig::default());

    let mut record = confirmed_record(&manager, "+14155550123").await;
    assert!(manager.update_phone(&mut record, "+14155550999").await.unwrap());

    assert_eq!(record.send_state(), SendState::Normal);
    let sent_after_change = notifier.delivery_count();

    // A save that does not touch the phone fires nothing
    assert!(manager.update_phone(&mut record, "+14155550123").await.unwrap());
    assert_eq!(notifier.delivery_count(), sent_after_change);
}

#[tokio::test]
async fn test_uniqueness_violation_surfaces_through_field_errors() {
    let (_store, _notifier, _clock, manager) = setup(ConfirmationConfig::default());

    let _other = confirmed_record(&manager, "+14155550999").await;
    let mut record = confirmed_record(&manager, "+14155550123").await;

    // Parking the taken number succeeds; the conflict appears when the
    // confirm-triggered save re-validates the changing phone value.
    assert!(manager.update_phone(&mut record, "+14155550999").await.unwrap());
    assert!(!manager.confirm(&mut record).await.unwrap());
    assert_eq!(record.errors().on("phone"), Some(&ConfirmationError::Taken));
}
