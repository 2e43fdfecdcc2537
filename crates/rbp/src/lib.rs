//! Territorial grid match engine.
//!
//! This facade crate re-exports every `arena-*` crate for convenient
//! access.
//!
//! - [`core`] — direction/type primitives, the shared error enum
//! - [`codec`] — RLE frame codec, move-line decoding
//! - [`mapgen`] — deterministic symmetric board generation
//! - [`resolve`] — per-turn move/combat/production resolution
//! - [`session`] — bot process sessions
//! - [`driver`] — match orchestration, replay assembly, ranking

pub use arena_codec as codec;
pub use arena_core as core;
pub use arena_driver as driver;
pub use arena_mapgen as mapgen;
pub use arena_resolve as resolve;
pub use arena_session as session;

pub use arena_core::*;
