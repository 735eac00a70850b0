//! # Ports Layer
//!
//! - `inbound.rs` - Driving ports (API exposed to request handlers)
//! - `outbound.rs` - Driven ports (backend, clock)

pub mod inbound;
pub mod outbound;
