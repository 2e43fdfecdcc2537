//! Wire codec for frames and move lines.
//!
//! - [`Frame`] — run-length `(owner, strength)` snapshot, encoded as a
//!   single space-separated line
//! - [`decode_moves`] — turns a bot's `x y d` triple line into a dense
//!   per-cell [`Direction`](arena_core::Direction) row, dropping anything
//!   the bot doesn't actually own
mod frame;
mod moves;

pub use frame::*;
pub use moves::*;
