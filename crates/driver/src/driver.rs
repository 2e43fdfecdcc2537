use std::time::Duration;

use arena_codec::{decode_moves, Frame};
use arena_core::{Direction, GameError};
use arena_mapgen::GameMap;
use futures::future::join_all;

use crate::bot::Bot;
use crate::ranking::{rank, FrameHistory, Ranking};
use crate::replay::Replay;

/// Timeouts the driver enforces on bot round trips.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub init_timeout: Duration,
    pub frame_timeout: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            init_timeout: Duration::from_secs(30),
            frame_timeout: Duration::from_secs(1),
        }
    }
}

pub struct MatchResult {
    pub replay: Replay,
    pub ranking: Ranking,
}

/// Runs one full match: generates the board, performs the init handshake,
/// gathers and resolves moves turn by turn until at most one player
/// survives or the turn cap is hit, then assembles the replay and ranking.
///
/// A bot that times out or sends a malformed move line is forfeited for
/// the remainder of the match (no further I/O, contributes only STILL
/// moves) rather than aborting the whole match; a bot that fails its init
/// handshake is fatal, since the driver cannot proceed without every
/// seat's reported name.
pub async fn run_match(
    mut bots: Vec<Box<dyn Bot>>,
    width: u16,
    height: u16,
    seed: u64,
    config: &MatchConfig,
) -> Result<MatchResult, GameError> {
    let num_players = bots.len() as u8;
    let mut map = arena_mapgen::generate(width, height, num_players, seed)?;

    let names = init_handshake(&mut bots, &map, config.init_timeout).await?;

    let mut owner_frames: Vec<Vec<u8>> = vec![map.owner.clone()];
    let mut strength_frames: Vec<Vec<u8>> = vec![map.strength.clone()];
    let mut collapsed_moves: Vec<Vec<u8>> = Vec::new();
    let mut forfeited = vec![false; bots.len()];

    let max_turns = map.max_turns();
    for turn in 0..max_turns {
        let territory = territory_counts(&map, bots.len());
        let alive_count = territory.iter().filter(|&&t| t > 0).count();
        if alive_count <= 1 {
            log::info!("match ends at turn {turn}: {alive_count} player(s) alive");
            break;
        }

        let moves = gather_moves(&mut bots, &map, &territory, &mut forfeited, config.frame_timeout).await;
        collapsed_moves.push(collapse(&moves, map.width as usize, map.height as usize));
        arena_resolve::resolve(&mut map, &moves);

        owner_frames.push(map.owner.clone());
        strength_frames.push(map.strength.clone());
    }

    for bot in bots.iter_mut() {
        if let Err(e) = bot.close().await {
            log::warn!("bot {} failed to close cleanly: {}", bot.bot_id(), e);
        }
    }

    let frames: Vec<(Vec<u8>, Vec<u8>)> = owner_frames
        .iter()
        .cloned()
        .zip(strength_frames.iter().cloned())
        .collect();

    let history = FrameHistory {
        owners: &owner_frames,
        num_players: bots.len(),
    };
    let ranking = rank(&history);

    let replay = Replay::new(
        map.width,
        map.height,
        num_players,
        names,
        map.production.clone(),
        frames,
        collapsed_moves,
        seed,
    );

    Ok(MatchResult { replay, ranking })
}

async fn init_handshake(
    bots: &mut [Box<dyn Bot>],
    map: &GameMap,
    init_timeout: Duration,
) -> Result<Vec<String>, GameError> {
    let production_line = map
        .production
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let frame0 = Frame::new(map.width, map.height, map.owner.clone(), map.strength.clone()).encode();

    let results = join_all(bots.iter_mut().map(|bot| {
        let production_line = production_line.as_str();
        let frame0 = frame0.as_str();
        let width = map.width;
        let height = map.height;
        async move {
            let bot_id = bot.bot_id();
            bot.write_line(&bot_id.to_string()).await?;
            bot.write_line(&format!("{} {}", width, height)).await?;
            bot.write_line(production_line).await?;
            bot.write_line(frame0).await?;
            let name = bot.read_line(init_timeout).await?;
            Ok::<String, GameError>(name.trim_end().to_string())
        }
    }))
    .await;

    results.into_iter().collect()
}

async fn gather_moves(
    bots: &mut [Box<dyn Bot>],
    map: &GameMap,
    territory: &[u32],
    forfeited: &mut [bool],
    frame_timeout: Duration,
) -> Vec<Vec<Direction>> {
    let frame_line = Frame::new(map.width, map.height, map.owner.clone(), map.strength.clone()).encode();
    let size = map.width as usize * map.height as usize;

    let results = join_all(bots.iter_mut().zip(forfeited.iter_mut()).zip(territory.iter()).map(
        |((bot, dead), &territory)| {
            let frame_line = frame_line.as_str();
            let owner = &map.owner;
            let width = map.width;
            let height = map.height;
            async move {
                // eliminated (owns no cells) or already forfeited: no I/O this turn.
                if *dead || territory == 0 {
                    return vec![Direction::Still; size];
                }
                let bot_id = bot.bot_id();
                let outcome = async {
                    bot.write_line(frame_line).await?;
                    let line = bot.read_line(frame_timeout).await?;
                    decode_moves(&line, bot_id, owner, width, height)
                }
                .await;
                match outcome {
                    Ok(directions) => directions,
                    Err(e) => {
                        log::warn!("bot {bot_id} forfeited for the remainder of the match: {e}");
                        *dead = true;
                        vec![Direction::Still; size]
                    }
                }
            }
        },
    ))
    .await;

    results
}

fn territory_counts(map: &GameMap, num_players: usize) -> Vec<u32> {
    let mut counts = vec![0u32; num_players];
    for &owner in &map.owner {
        if owner > 0 {
            counts[owner as usize - 1] += 1;
        }
    }
    counts
}

/// Element-wise max of each player's direction code, per cell.
fn collapse(moves: &[Vec<Direction>], width: usize, height: usize) -> Vec<u8> {
    let size = width * height;
    let mut collapsed = vec![0u8; size];
    for player_moves in moves {
        for (idx, &dir) in player_moves.iter().enumerate() {
            collapsed[idx] = collapsed[idx].max(dir as u8);
        }
    }
    collapsed
}
