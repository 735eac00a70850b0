//! # Adapters Module
//!
//! - `local`: In-process fixed-window store (fallback)
//! - `upstash`: Redis REST sliding-window backend
//! - `clock`: Wall and manual clocks

pub mod clock;
pub mod local;
pub mod upstash;

pub use clock::{ManualClock, SystemClock};
pub use local::LocalWindowStore;
pub use upstash::{UpstashRestBackend, DEFAULT_KEY_PREFIX};
