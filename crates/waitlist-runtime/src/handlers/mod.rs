//! # Request Handlers
//!
//! Orchestration of the public flows over the subsystem container.

pub mod signup;

pub use signup::{
    SignupCoordinator, SignupError, SignupOutcome, SignupRequest, SignupResponse,
};
