//! # Domain Entities
//!
//! The waitlist entry and the inputs that create or change one.
//!
//! ## Immutable Fields
//!
//! `id`, `email`, `original_position`, `referral_code`, `referred_by` and
//! `created_at` are fixed at creation. [`EntryUpdate`] has no slot for them,
//! so the ledger cannot be asked to change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source recorded when the signup carried no referral.
pub const SOURCE_DIRECT: &str = "direct";

/// Source recorded when the signup carried a referral code.
pub const SOURCE_REFERRAL: &str = "referral";

/// One signup, keyed by normalized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    /// Opaque identifier assigned at creation.
    pub id: String,
    /// Normalized (trimmed, lowercased) email. Primary key.
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identifier in the downstream mailing-list provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_subscriber_id: Option<String>,
    /// Current queue rank, always >= 1.
    pub position: u64,
    /// Rank at creation, never changes.
    pub original_position: u64,
    /// This entrant's own referral code (uppercase).
    pub referral_code: String,
    /// Code of the entrant who referred this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
    /// Successful referrals credited to this entry.
    #[serde(default)]
    pub referral_count: u64,
    /// Preferred locale.
    pub locale: String,
    /// Acquisition channel.
    pub source: String,
    /// Free-form labels, unique, in first-seen order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl WaitlistEntry {
    /// Spots gained through referrals so far.
    pub fn spots_gained(&self) -> u64 {
        self.original_position.saturating_sub(self.position)
    }
}

/// Input for [`add_entry`](crate::ports::inbound::WaitlistLedgerApi::add_entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub email: String,
    pub referral_code: String,
    pub locale: String,
    pub name: Option<String>,
    pub referred_by: Option<String>,
    pub source: Option<String>,
    pub tags: Vec<String>,
}

impl NewEntry {
    /// Minimal signup: email, assigned referral code and locale.
    pub fn new(
        email: impl Into<String>,
        referral_code: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            referral_code: referral_code.into(),
            locale: locale.into(),
            name: None,
            referred_by: None,
            source: None,
            tags: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_referred_by(mut self, code: impl Into<String>) -> Self {
        self.referred_by = Some(code.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Source to record: explicit value, else derived from the referral.
    pub fn resolved_source(&self) -> String {
        match &self.source {
            Some(source) if !source.trim().is_empty() => source.trim().to_string(),
            _ if self.referred_by.is_some() => SOURCE_REFERRAL.to_string(),
            _ => SOURCE_DIRECT.to_string(),
        }
    }
}

/// Partial update of the mutable fields of an entry.
///
/// `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub name: Option<String>,
    pub external_subscriber_id: Option<String>,
    /// Clamped to >= 1 when applied.
    pub position: Option<u64>,
    pub referral_count: Option<u64>,
    pub locale: Option<String>,
    pub source: Option<String>,
    /// Replaces the tag list (de-duplicated).
    pub tags: Option<Vec<String>>,
}

impl EntryUpdate {
    /// Does the update change anything at all?
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge into `entry`. Does not touch `updated_at`.
    pub(crate) fn apply_to(self, entry: &mut WaitlistEntry) {
        if let Some(name) = self.name {
            entry.name = Some(name);
        }
        if let Some(id) = self.external_subscriber_id {
            entry.external_subscriber_id = Some(id);
        }
        if let Some(position) = self.position {
            entry.position = position.max(1);
        }
        if let Some(count) = self.referral_count {
            entry.referral_count = count;
        }
        if let Some(locale) = self.locale {
            entry.locale = locale;
        }
        if let Some(source) = self.source {
            entry.source = source;
        }
        if let Some(tags) = self.tags {
            entry.tags = merge_tags(&[], &tags);
        }
    }
}

/// Normalize an email for use as a key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Union of `existing` and `incoming`, first occurrence wins, blanks dropped.
pub fn merge_tags(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + incoming.len());
    for tag in existing.iter().chain(incoming) {
        let tag = tag.trim();
        if tag.is_empty() || merged.iter().any(|t| t == tag) {
            continue;
        }
        merged.push(tag.to_string());
    }
    merged
}
