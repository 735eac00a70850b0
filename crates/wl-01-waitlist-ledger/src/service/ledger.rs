use super::WaitlistLedger;
use crate::domain::entities::{merge_tags, normalize_email, EntryUpdate, NewEntry, WaitlistEntry};
use crate::domain::errors::LedgerError;
use crate::domain::referral::{apply_referral, normalize_referral_code};
use crate::ports::inbound::{LedgerStats, WaitlistLedgerApi};
use crate::ports::outbound::{EntryRepository, TimeSource};
use uuid::Uuid;

impl<R, T> WaitlistLedger<R, T>
where
    R: EntryRepository,
    T: TimeSource,
{
    /// Record the downstream mailing-list id of an entry.
    pub fn set_external_subscriber_id(
        &mut self,
        email: &str,
        subscriber_id: impl Into<String>,
    ) -> Result<Option<WaitlistEntry>, LedgerError> {
        self.update_entry(
            email,
            EntryUpdate {
                external_subscriber_id: Some(subscriber_id.into()),
                ..Default::default()
            },
        )
    }

    fn next_entry_id(&mut self) -> String {
        self.entry_id_counter += 1;
        let suffix = Uuid::new_v4().simple().to_string();
        format!("wl_{}_{}", self.entry_id_counter, &suffix[..8])
    }

    /// Apply `change` to one entry, refresh `updated_at` and persist.
    fn mutate<F>(&mut self, email: &str, change: F) -> Result<Option<WaitlistEntry>, LedgerError>
    where
        F: FnOnce(&mut WaitlistEntry),
    {
        let key = normalize_email(email);
        let checkpoint = self.checkpoint(&key);
        let now = self.time_source.now();

        let Some(entry) = self.entries.get_mut(&key) else {
            return Ok(None);
        };
        change(entry);
        entry.updated_at = now;
        let updated = entry.clone();

        self.commit(checkpoint)?;
        Ok(Some(updated))
    }
}

impl<R, T> WaitlistLedgerApi for WaitlistLedger<R, T>
where
    R: EntryRepository,
    T: TimeSource,
{
    fn add_entry(&mut self, new: NewEntry) -> Result<WaitlistEntry, LedgerError> {
        let key = normalize_email(&new.email);
        if self.entries.contains_key(&key) {
            tracing::debug!("[wl-01] Rejected duplicate signup");
            return Err(LedgerError::DuplicateEmail);
        }

        let referral_code = normalize_referral_code(&new.referral_code);
        if self.by_referral_code.contains_key(&referral_code) {
            return Err(LedgerError::DuplicateReferralCode {
                code: referral_code,
            });
        }

        let source = new.resolved_source();
        let now = self.time_source.now();
        self.position_counter += 1;
        let position = self.position_counter;
        let id = self.next_entry_id();

        let entry = WaitlistEntry {
            id,
            email: key.clone(),
            name: new.name.filter(|n| !n.trim().is_empty()),
            external_subscriber_id: None,
            position,
            original_position: position,
            referral_code,
            referred_by: new
                .referred_by
                .as_deref()
                .map(normalize_referral_code)
                .filter(|c| !c.is_empty()),
            referral_count: 0,
            locale: new.locale,
            source,
            tags: merge_tags(&[], &new.tags),
            created_at: now,
            updated_at: now,
        };

        let checkpoint = self.checkpoint(&key);
        self.index(key, entry.clone());
        self.commit(checkpoint)?;

        tracing::info!(
            entry_id = %entry.id,
            position,
            source = %entry.source,
            "[wl-01] Entry added"
        );
        Ok(entry)
    }

    fn get_by_email(&self, email: &str) -> Option<WaitlistEntry> {
        self.entries.get(&normalize_email(email)).cloned()
    }

    fn get_by_id(&self, id: &str) -> Option<WaitlistEntry> {
        self.by_id
            .get(id.trim())
            .and_then(|key| self.entries.get(key))
            .cloned()
    }

    fn get_by_referral_code(&self, code: &str) -> Option<WaitlistEntry> {
        self.by_referral_code
            .get(&normalize_referral_code(code))
            .and_then(|key| self.entries.get(key))
            .cloned()
    }

    fn exists(&self, email: &str) -> bool {
        self.entries.contains_key(&normalize_email(email))
    }

    fn update_entry(
        &mut self,
        email: &str,
        update: EntryUpdate,
    ) -> Result<Option<WaitlistEntry>, LedgerError> {
        let updated = self.mutate(email, |entry| update.apply_to(entry))?;
        if let Some(entry) = &updated {
            tracing::debug!(entry_id = %entry.id, "[wl-01] Entry updated");
        }
        Ok(updated)
    }

    fn process_referral(
        &mut self,
        referrer_email: &str,
        spots_per_referral: u64,
    ) -> Result<Option<WaitlistEntry>, LedgerError> {
        let updated = self.mutate(referrer_email, |entry| {
            entry.referral_count = entry.referral_count.saturating_add(1);
            entry.position = apply_referral(entry.position, spots_per_referral);
        })?;

        match &updated {
            Some(entry) => tracing::info!(
                entry_id = %entry.id,
                position = entry.position,
                referral_count = entry.referral_count,
                "[wl-01] Referral credited"
            ),
            None => tracing::debug!("[wl-01] Referral for unknown referrer ignored"),
        }
        Ok(updated)
    }

    fn add_tags(&mut self, email: &str, tags: &[String]) -> Result<Option<WaitlistEntry>, LedgerError> {
        self.mutate(email, |entry| entry.tags = merge_tags(&entry.tags, tags))
    }

    fn delete_by_email(&mut self, email: &str) -> Result<bool, LedgerError> {
        let key = normalize_email(email);
        let checkpoint = self.checkpoint(&key);
        let Some(removed) = self.unindex(&key) else {
            return Ok(false);
        };
        self.commit(checkpoint)?;

        tracing::info!(entry_id = %removed.id, "[wl-01] Entry erased");
        Ok(true)
    }

    fn total_count(&self) -> usize {
        self.entries.len()
    }

    fn all_entries(&self) -> Vec<WaitlistEntry> {
        self.entries_by_position()
    }

    fn stats(&self) -> LedgerStats {
        LedgerStats {
            total_entries: self.entries.len(),
            referred_entries: self
                .entries
                .values()
                .filter(|e| e.referred_by.is_some())
                .count(),
            total_referrals: self.entries.values().map(|e| e.referral_count).sum(),
            position_counter: self.position_counter,
            entry_id_counter: self.entry_id_counter,
        }
    }
}
