//! # Domain Layer
//!
//! Pure domain logic for the Waitlist Ledger subsystem.
//!
//! ## Modules
//!
//! - `entities` - `WaitlistEntry`, `NewEntry`, `EntryUpdate`
//! - `referral` - Referral code generation/validation and reordering math
//! - `snapshot` - Persisted ledger state
//! - `value_objects` - Configuration
//! - `errors` - Domain error types

pub mod entities;
pub mod errors;
pub mod referral;
pub mod snapshot;
pub mod value_objects;
