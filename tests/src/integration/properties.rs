//! # Ledger and Codec Properties
//!
//! Randomised checks over the in-memory ledger and the field codec.

use proptest::prelude::*;
use shared_crypto::{EncryptionCodec, RuntimeMode, SecretKey};
use wl_01_waitlist_ledger::{
    calculate_new_position, LedgerConfig, LedgerError, NewEntry, WaitlistLedger,
    WaitlistLedgerApi,
};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn case_variant(email: &str, mask: u64) -> String {
    email
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if (mask >> (i % 64)) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

#[test]
fn test_tags_are_idempotent() {
    let mut ledger = WaitlistLedger::new_in_memory(LedgerConfig::default());
    ledger
        .add_entry(NewEntry::new("t@x.com", "REFTAGS1", "en"))
        .unwrap();

    ledger.add_tags("t@x.com", &tags(&["a"])).unwrap();
    let entry = ledger.add_tags("t@x.com", &tags(&["a", "b"])).unwrap().unwrap();

    assert_eq!(entry.tags, tags(&["a", "b"]));
}

proptest! {
    /// A second insert of any case variant fails and changes nothing.
    #[test]
    fn prop_email_uniqueness(local in "[a-z0-9]{1,12}", domain in "[a-z]{1,8}", mask in any::<u64>()) {
        let email = format!("{local}@{domain}.com");
        let mut ledger = WaitlistLedger::new_in_memory(LedgerConfig::default());
        ledger.add_entry(NewEntry::new(email.clone(), "REFFIRST1", "en")).unwrap();
        let before = ledger.snapshot();

        let variant = case_variant(&email, mask);
        let result = ledger.add_entry(NewEntry::new(variant.clone(), "REFSECND2", "en"));

        prop_assert!(matches!(result, Err(LedgerError::DuplicateEmail)));
        prop_assert_eq!(ledger.snapshot(), before);
        prop_assert_eq!(ledger.get_by_email(&variant).map(|e| e.email), Some(email));
    }

    /// Positions handed out by successive inserts strictly increase, even
    /// with deletions in between.
    #[test]
    fn prop_monotonic_positions(ops in prop::collection::vec(any::<bool>(), 1..40)) {
        let mut ledger = WaitlistLedger::new_in_memory(LedgerConfig::default());
        let mut last = 0u64;
        let mut live: Vec<String> = Vec::new();

        for (i, delete) in ops.into_iter().enumerate() {
            if delete && !live.is_empty() {
                let email = live.remove(0);
                prop_assert!(ledger.delete_by_email(&email).unwrap());
                continue;
            }
            let email = format!("user{i}@x.com");
            let code = ledger.generate_unique_referral_code().unwrap();
            let entry = ledger.add_entry(NewEntry::new(email.clone(), code, "en")).unwrap();
            prop_assert!(entry.position > last);
            last = entry.position;
            live.push(email);
        }
    }

    /// Referral credits never push a position below 1.
    #[test]
    fn prop_referral_floor(baseline in 0u64..100, referrals in 0usize..30, spots in 0u64..1000) {
        let config = LedgerConfig::default().with_position_baseline(baseline);
        let mut ledger = WaitlistLedger::new_in_memory(config);
        ledger.add_entry(NewEntry::new("r@x.com", "REFREFR1", "en")).unwrap();

        let mut position = baseline + 1;
        for _ in 0..referrals {
            position = ledger.process_referral("r@x.com", spots).unwrap().unwrap().position;
            prop_assert!(position >= 1);
        }
        prop_assert_eq!(
            position,
            calculate_new_position(baseline + 1, referrals as u64, spots)
        );
    }

    /// Any non-empty string survives encrypt then decrypt.
    #[test]
    fn prop_codec_roundtrip(value in "\\PC{1,64}") {
        let codec = EncryptionCodec::new(Some(SecretKey::generate()), RuntimeMode::Production);
        let sealed = codec.encrypt(&value).unwrap();
        prop_assert_eq!(codec.decrypt(&sealed), Some(value));
    }
}
