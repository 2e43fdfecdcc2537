/// Upper bound on simultaneous players; fixes the width of the stats table.
pub const MAX_PLAYERS: u8 = 6;

/// Number of tracked per-player statistics (see `arena_resolve::StatKind`).
pub const STAT_COUNT: usize = 9;

/// 1-indexed seat identifier. `0` always means neutral/unowned.
pub type PlayerId = u8;
