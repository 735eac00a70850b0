//! # Waitlist Core Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs      # Container over a temp snapshot file
//!     ├── signup_flow.rs  # Rate limit → ledger → referral credit
//!     ├── persistence.rs  # Restarts, encryption at rest
//!     ├── rate_limit.rs   # Window behavior through the public API
//!     └── properties.rs   # Ledger and codec properties (proptest)
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wl-tests
//! cargo test -p wl-tests integration::persistence
//! ```

pub mod integration;
