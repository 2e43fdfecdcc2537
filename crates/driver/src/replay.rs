use serde::Serialize;

const REPLAY_VERSION: u32 = 11;

/// Full record of a finished match, serializable for external storage.
/// Compression and persistence of the serialized blob are a caller
/// concern; this type only shapes the payload.
#[derive(Debug, Clone, Serialize)]
pub struct Replay {
    pub version: u32,
    pub width: u16,
    pub height: u16,
    pub num_players: u8,
    pub num_frames: u32,
    pub player_names: Vec<String>,
    /// Row-major, length `width * height`.
    pub productions: Vec<u8>,
    /// One `(owner, strength)` pair per frame, each row-major and length
    /// `width * height`.
    pub frames: Vec<(Vec<u8>, Vec<u8>)>,
    /// One collapsed `(height * width)` direction grid per turn, length
    /// `num_frames - 1`. Each cell holds the max direction code across the
    /// players that issued a move there.
    pub moves: Vec<Vec<u8>>,
    pub seed: u64,
}

impl Replay {
    pub fn new(
        width: u16,
        height: u16,
        num_players: u8,
        player_names: Vec<String>,
        productions: Vec<u8>,
        frames: Vec<(Vec<u8>, Vec<u8>)>,
        moves: Vec<Vec<u8>>,
        seed: u64,
    ) -> Self {
        Self {
            version: REPLAY_VERSION,
            width,
            height,
            num_players,
            num_frames: frames.len() as u32,
            player_names,
            productions,
            frames,
            moves,
            seed,
        }
    }
}
