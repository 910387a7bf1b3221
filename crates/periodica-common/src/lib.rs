//! Periodica Common - shared types for all Periodica crates
//!
//! This crate provides:
//! - `PeriodicaError`: the application error taxonomy
//! - `ErrorCode` constants used in API error envelopes

pub mod error;

pub use error::{ErrorCode, PeriodicaError};
