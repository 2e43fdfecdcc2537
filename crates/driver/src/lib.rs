//! Match orchestration: init handshake, per-turn move gather/resolve,
//! replay assembly, and post-match ranking.
mod bot;
mod driver;
mod ranking;
mod replay;

pub use bot::{Bot, StillBot};
pub use driver::{run_match, MatchConfig, MatchResult};
pub use ranking::{rank, FrameHistory, Ranking};
pub use replay::Replay;
