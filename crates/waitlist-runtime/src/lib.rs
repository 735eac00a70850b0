//! # Waitlist Runtime
//!
//! Wires the waitlist subsystems together.
//!
//! ## Modular Structure
//!
//! - `container/` - Environment configuration and the subsystem container
//! - `handlers/` - Signup orchestration (rate limit, ledger, referral credit)
//! - `cli` - The `waitlist-admin` operator commands
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Refuse to start in production without an encryption key
//! 3. Open the ledger from its snapshot file
//! 4. Build the rate limiter, with the distributed backend when configured

pub mod cli;
pub mod container;
pub mod handlers;

pub use container::{ConfigError, StartupError, WaitlistConfig, WaitlistContainer};
pub use handlers::{SignupCoordinator, SignupOutcome, SignupRequest, SignupResponse};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
