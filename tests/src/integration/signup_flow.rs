//! # Signup Flow
//!
//! RateLimiter → Ledger → referral credit → snapshot, through the same
//! coordinator the public endpoint uses.

use super::harness::WaitlistHarness;
use waitlist_runtime::{SignupOutcome, SignupRequest};
use wl_01_waitlist_ledger::{NewEntry, WaitlistEntry, WaitlistLedgerApi};

fn created(outcome: SignupOutcome) -> WaitlistEntry {
    match outcome {
        SignupOutcome::Created(entry) => entry,
        other => panic!("Expected Created, got {other:?}"),
    }
}

/// Fresh store, baseline 847: the first signup lands at 848.
#[test]
fn test_first_entry_on_fresh_store() {
    let harness = WaitlistHarness::new();

    let entry = harness
        .container
        .ledger
        .write()
        .add_entry(NewEntry::new("new@x.com", "REFABC123", "en"))
        .unwrap();

    assert_eq!(entry.position, 848);
    assert_eq!(entry.original_position, 848);
    assert_eq!(entry.referral_count, 0);
}

/// Referrer at 848 with no referrals: one credit of 10 spots → 838.
#[test]
fn test_process_referral_moves_referrer() {
    let harness = WaitlistHarness::new();
    let mut ledger = harness.container.ledger.write();
    ledger
        .add_entry(NewEntry::new("referrer@x.com", "REFABC123", "en"))
        .unwrap();

    let updated = ledger.process_referral("referrer@x.com", 10).unwrap().unwrap();

    assert_eq!(updated.position, 838);
    assert_eq!(updated.referral_count, 1);
    assert_eq!(updated.original_position, 848);
}

/// Delete, then `exists` is false; deleting again reports nothing removed.
#[test]
fn test_delete_by_email() {
    let harness = WaitlistHarness::new();
    let mut ledger = harness.container.ledger.write();
    ledger
        .add_entry(NewEntry::new("gone@x.com", "REFGONE1", "en"))
        .unwrap();

    assert!(ledger.delete_by_email("gone@x.com").unwrap());
    assert!(!ledger.exists("gone@x.com"));
    assert!(!ledger.delete_by_email("gone@x.com").unwrap());
    assert!(!ledger.delete_by_email("never@x.com").unwrap());
}

#[tokio::test]
async fn test_referral_chain_through_coordinator() {
    let harness = WaitlistHarness::new();
    let coordinator = harness.coordinator();

    let first = created(
        coordinator
            .signup(SignupRequest::new("first@x.com", "10.0.0.1").with_name("First"))
            .await
            .unwrap(),
    );

    // three friends sign up with first's code, from different addresses
    for i in 0..3 {
        let friend = created(
            coordinator
                .signup(
                    SignupRequest::new(format!("friend{i}@x.com"), format!("10.0.1.{i}"))
                        .with_referred_by(first.referral_code.clone()),
                )
                .await
                .unwrap(),
        );
        assert_eq!(friend.referred_by.as_deref(), Some(first.referral_code.as_str()));
    }

    let ledger = harness.container.ledger.read();
    let credited = ledger.get_by_email("first@x.com").unwrap();
    assert_eq!(credited.referral_count, 3);
    assert_eq!(credited.position, 848 - 30);
    assert_eq!(credited.spots_gained(), 30);

    let stats = ledger.stats();
    assert_eq!(stats.total_entries, 4);
    assert_eq!(stats.referred_entries, 3);
    assert_eq!(stats.total_referrals, 3);
    assert_eq!(stats.position_counter, 851);

    let order: Vec<String> = ledger.all_entries().into_iter().map(|e| e.email).collect();
    assert_eq!(order[0], "first@x.com");
}

#[tokio::test]
async fn test_existing_email_is_not_revealed() {
    let harness = WaitlistHarness::new();
    let coordinator = harness.coordinator();

    let fresh = coordinator
        .signup(SignupRequest::new("taken@x.com", "10.0.0.1"))
        .await
        .unwrap();
    let repeat = coordinator
        .signup(SignupRequest::new("TAKEN@x.com", "10.0.0.2"))
        .await
        .unwrap();

    assert!(matches!(repeat, SignupOutcome::AlreadyRegistered));
    assert_eq!(
        serde_json::to_string(&fresh.response()).unwrap(),
        serde_json::to_string(&repeat.response()).unwrap()
    );
    assert_eq!(harness.container.ledger.read().total_count(), 1);
}

#[tokio::test]
async fn test_concurrent_signups_get_distinct_positions() {
    let harness = WaitlistHarness::new();
    let coordinator = harness.coordinator();

    let mut handles = Vec::new();
    for i in 0..20u32 {
        let coordinator = coordinator.clone();
        handles.push(tokio::spawn(async move {
            coordinator
                .signup(SignupRequest::new(
                    format!("user{i}@x.com"),
                    format!("10.1.0.{i}"),
                ))
                .await
        }));
    }

    let mut positions = Vec::new();
    for handle in handles {
        positions.push(created(handle.await.unwrap().unwrap()).position);
    }
    positions.sort_unstable();

    assert_eq!(positions, (848..868).collect::<Vec<u64>>());
}
