//! Shared primitives for the territorial grid match engine.
//!
//! This crate has no engine logic of its own — it is the bottom of the
//! dependency graph that every other `arena-*` crate builds on.
//!
//! ## Core Types
//!
//! - [`Direction`] — the five per-cell commands and their toroidal deltas
//! - [`PlayerId`] — 1-indexed player identifier (0 = neutral)
//! - [`GameError`] — the five error kinds a match can surface
//!
//! ## Grid
//!
//! - [`wrap`] — Euclidean-modulus index wraparound, the only arithmetic
//!   any component is allowed to use when stepping off a cell
mod constants;
mod direction;
mod error;
mod grid;

pub use constants::*;
pub use direction::*;
pub use error::*;
pub use grid::*;

/// Random instance generation, used only by tests and fixtures.
pub trait Arbitrary {
    fn random() -> Self;
}

/// Initialize a terminal logger. Call once from a binary's `main`.
#[cfg(feature = "server")]
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
