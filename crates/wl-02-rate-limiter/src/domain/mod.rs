//! # Domain Layer
//!
//! Pure domain logic for the Rate Limiter subsystem.
//!
//! ## Modules
//!
//! - `config` - Presets and limiter tunables
//! - `decision` - Check outcome and response headers
//! - `window` - Per-identifier fixed window state machine
//! - `circuit` - Consecutive-failure circuit around the backend
//! - `client_ip` - Identifier extraction from request headers
//! - `errors` - Backend error types

pub mod circuit;
pub mod client_ip;
pub mod config;
pub mod decision;
pub mod errors;
pub mod window;
