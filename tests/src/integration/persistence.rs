//! # Persistence Across Restarts
//!
//! Everything a signup produced must come back after the container is
//! rebuilt, and personal fields must never reach the file in clear text.

use super::harness::WaitlistHarness;
use shared_crypto::{EncryptionCodec, RuntimeMode};
use waitlist_runtime::{SignupOutcome, SignupRequest, StartupError};
use wl_01_waitlist_ledger::{EntryUpdate, WaitlistLedgerApi};

#[tokio::test]
async fn test_state_survives_restart() {
    let mut harness = WaitlistHarness::new();
    let coordinator = harness.coordinator();

    let SignupOutcome::Created(referrer) = coordinator
        .signup(SignupRequest::new("ref@x.com", "10.0.0.1").with_name("Jane Doe"))
        .await
        .unwrap()
    else {
        panic!("referrer not created");
    };
    coordinator
        .signup(
            SignupRequest::new("friend@x.com", "10.0.0.2")
                .with_referred_by(referrer.referral_code.clone())
                .with_tags(["beta"]),
        )
        .await
        .unwrap();
    harness
        .container
        .ledger
        .write()
        .set_external_subscriber_id("ref@x.com", "sub_1")
        .unwrap();
    let before = harness.container.ledger.read().snapshot();
    drop(coordinator);

    harness.restart();

    let ledger = harness.container.ledger.read();
    assert_eq!(ledger.snapshot(), before);

    let reloaded = ledger.get_by_email("ref@x.com").unwrap();
    assert_eq!(reloaded.name.as_deref(), Some("Jane Doe"));
    assert_eq!(reloaded.position, 838);
    assert_eq!(reloaded.external_subscriber_id.as_deref(), Some("sub_1"));
    assert_eq!(
        ledger.get_by_referral_code(&referrer.referral_code).unwrap().email,
        "ref@x.com"
    );
}

#[tokio::test]
async fn test_positions_continue_after_restart() {
    let mut harness = WaitlistHarness::new();
    for i in 0..3 {
        harness
            .coordinator()
            .signup(SignupRequest::new(format!("u{i}@x.com"), format!("10.0.0.{i}")))
            .await
            .unwrap();
    }
    harness
        .container
        .ledger
        .write()
        .delete_by_email("u2@x.com")
        .unwrap();

    harness.restart();

    let outcome = harness
        .coordinator()
        .signup(SignupRequest::new("late@x.com", "10.0.0.9"))
        .await
        .unwrap();
    let SignupOutcome::Created(entry) = outcome else {
        panic!("late signup not created");
    };
    assert_eq!(entry.position, 851);
    assert!(entry.id.starts_with("wl_4_"));
}

#[test]
fn test_snapshot_file_holds_no_plaintext_pii() {
    let harness = WaitlistHarness::new();
    {
        let mut ledger = harness.container.ledger.write();
        let code = ledger.generate_unique_referral_code().unwrap();
        ledger
            .add_entry(
                wl_01_waitlist_ledger::NewEntry::new("secret.person@example.com", code, "de")
                    .with_name("Jane Doe"),
            )
            .unwrap();
    }

    let raw = harness.raw_snapshot();
    assert!(!raw.is_empty());
    assert!(!raw.contains("secret.person@example.com"));
    assert!(!raw.contains("Jane Doe"));
    // non-PII fields stay readable
    assert!(raw.contains("\"positionCounter\": 848"));
    assert!(raw.contains("\"locale\": \"de\""));
}

#[test]
fn test_legacy_plaintext_snapshot_is_readable_and_resealed() {
    let harness = WaitlistHarness::new();
    let legacy = r#"{
        "entries": [{
            "id": "wl_1_legacy00",
            "email": "old.timer@example.com",
            "name": "Old Timer",
            "position": 848,
            "originalPosition": 848,
            "referralCode": "REFOLD123",
            "referralCount": 0,
            "locale": "en",
            "source": "direct",
            "tags": [],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }],
        "positionCounter": 848,
        "entryIdCounter": 1
    }"#;
    std::fs::write(harness.snapshot_path(), legacy).unwrap();

    let container = harness
        .open_with_key(Some(shared_crypto::generate_key_base64().as_str()), RuntimeMode::Production)
        .unwrap();
    {
        let mut ledger = container.ledger.write();
        let entry = ledger.get_by_email("old.timer@example.com").unwrap();
        assert_eq!(entry.name.as_deref(), Some("Old Timer"));

        // the next write stores both fields encrypted
        ledger
            .update_entry(
                "old.timer@example.com",
                EntryUpdate {
                    locale: Some("fr".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
    }

    let raw = std::fs::read_to_string(harness.snapshot_path()).unwrap();
    assert!(!raw.contains("old.timer@example.com"));
    assert!(!raw.contains("Old Timer"));
}

#[test]
fn test_production_without_key_refuses_to_start() {
    let harness = WaitlistHarness::new();

    let result = harness.open_with_key(None, RuntimeMode::Production);

    assert!(matches!(result, Err(StartupError::Config(_))));
}

#[test]
fn test_development_without_key_stores_plaintext() {
    let harness = WaitlistHarness::new();
    let container = harness
        .open_with_key(None, RuntimeMode::Development)
        .unwrap();
    {
        let mut ledger = container.ledger.write();
        let code = ledger.generate_unique_referral_code().unwrap();
        ledger
            .add_entry(wl_01_waitlist_ledger::NewEntry::new("dev@example.com", code, "en"))
            .unwrap();
    }

    let raw = std::fs::read_to_string(harness.snapshot_path()).unwrap();
    assert!(raw.contains("dev@example.com"));
}

/// `encrypt("Jane Doe")` then `decrypt` gives back the exact input.
#[test]
fn test_codec_roundtrip_and_legacy_passthrough() {
    let codec = EncryptionCodec::from_base64_key(
        Some(shared_crypto::generate_key_base64().as_str()),
        RuntimeMode::Production,
    )
    .unwrap();

    let sealed = codec.encrypt("Jane Doe").unwrap();
    assert_ne!(sealed, "Jane Doe");
    assert_eq!(codec.decrypt(&sealed).as_deref(), Some("Jane Doe"));
    assert_eq!(
        codec.decrypt("plain@example.com").as_deref(),
        Some("plain@example.com")
    );
}
