//! Deterministic procedural map generation.
//!
//! [`generate`] reproduces the tiling → factor-kernel → tesselate →
//! reflect → shift → blur → scale pipeline: given the same
//! `(width, height, num_players, seed)` it always returns the same board.
mod generator;
mod map;
mod region;

pub use generator::generate;
pub use map::{GameMap, max_turns};
