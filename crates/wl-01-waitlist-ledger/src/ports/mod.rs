//! # Ports Layer
//!
//! Defines the port traits for the Waitlist Ledger subsystem.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (API exposed to route handlers and tooling)
//! - `outbound.rs` - Driven ports (dependencies required by the service)

pub mod inbound;
pub mod outbound;
