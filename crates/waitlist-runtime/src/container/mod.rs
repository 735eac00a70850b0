//! # Subsystem Container
//!
//! Central container holding the waitlist subsystem instances, built from
//! environment configuration with dependency injection.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, WaitlistConfig};
pub use subsystems::{FileLedger, StartupError, WaitlistContainer};
