//! # Integration Tests
//!
//! Cross-subsystem flows over real snapshot files.

pub mod harness;

#[cfg(test)]
mod persistence;
#[cfg(test)]
mod properties;
#[cfg(test)]
mod rate_limit;
#[cfg(test)]
mod signup_flow;
