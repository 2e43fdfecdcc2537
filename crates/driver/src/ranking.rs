/// Per-frame `(owner, strength)` planes, row-major, length `width * height`.
/// Only `owner` matters for ranking.
pub struct FrameHistory<'a> {
    pub owners: &'a [Vec<u8>],
    pub num_players: usize,
}

/// Derives finishing order and last-alive frame index per player.
///
/// Players who go from alive to dead between consecutive frames are
/// eliminated together, ordered within that cohort by ascending
/// `(territory, cumulative_territory, player_id)`, weakest die-off first.
/// Survivors at the final frame are appended last, under the same
/// ordering. The full elimination-then-survivor sequence is reversed to
/// read best-first; `ranks[p]` is player `p`'s 0-based position in that
/// order.
pub struct Ranking {
    pub ranks: Vec<usize>,
    pub last_alive: Vec<i64>,
}

pub fn rank(history: &FrameHistory) -> Ranking {
    let num_frames = history.owners.len();
    let p = history.num_players;

    let mut territory = vec![vec![0u32; p]; num_frames];
    for f in 0..num_frames {
        for &owner in &history.owners[f] {
            if owner > 0 {
                territory[f][owner as usize - 1] += 1;
            }
        }
    }
    let alive: Vec<Vec<bool>> = territory
        .iter()
        .map(|row| row.iter().map(|&t| t > 0).collect())
        .collect();

    let mut cumulative = vec![0u64; p];
    // cohorts in elimination order: earliest-eliminated first, survivors last.
    let mut worst_first_cohorts: Vec<Vec<usize>> = Vec::new();

    for f in 0..num_frames.saturating_sub(1) {
        let mut eliminated: Vec<usize> = (0..p)
            .filter(|&player| alive[f][player] && !alive[f + 1][player])
            .collect();
        for &player in &eliminated {
            cumulative[player] += territory[f][player] as u64;
        }
        if !eliminated.is_empty() {
            eliminated.sort_by_key(|&player| (territory[f][player], cumulative[player], player));
            worst_first_cohorts.push(eliminated);
        }
        for player in 0..p {
            if alive[f][player] && alive[f + 1][player] {
                cumulative[player] += territory[f][player] as u64;
            }
        }
    }

    let last_frame = num_frames - 1;
    let mut survivors: Vec<usize> = (0..p).filter(|&player| alive[last_frame][player]).collect();
    survivors.sort_by_key(|&player| {
        (
            territory[last_frame][player],
            cumulative[player] + territory[last_frame][player] as u64,
            player,
        )
    });
    if !survivors.is_empty() {
        worst_first_cohorts.push(survivors);
    }

    let mut best_first: Vec<usize> = worst_first_cohorts.into_iter().flatten().collect();
    best_first.reverse();

    let mut ranks = vec![0usize; p];
    for (position, &player) in best_first.iter().enumerate() {
        ranks[player] = position;
    }

    let last_alive: Vec<i64> = (0..p)
        .map(|player| {
            let alive_count = alive.iter().filter(|row| row[player]).count() as i64;
            alive_count - 1
        })
        .collect();

    Ranking { ranks, last_alive }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_plane(owners: &[u8]) -> Vec<u8> {
        owners.to_vec()
    }

    #[test]
    fn elimination_and_survival_produce_the_literal_scenario() {
        // 3 players on a 1-cell-per-player toy board so territory is just
        // "does this cell still belong to me". player 3 dies at frame 5
        // (territory 2 there), player 1 dies at frame 8 (territory 5),
        // player 2 survives (territory 9). We fake territory counts by
        // repeating owner cells rather than tracking a real board.
        let mut owners: Vec<Vec<u8>> = Vec::new();
        for f in 0..10 {
            let mut row = Vec::new();
            // player 1: territory 5 while alive (frames 0..=8), dead at frame 9
            if f <= 8 {
                row.extend(std::iter::repeat(1u8).take(5));
            }
            // player 2: territory 9, alive through the final frame (9)
            row.extend(std::iter::repeat(2u8).take(9));
            // player 3: territory 2 while alive (frames 0..=5), dead at frame 6
            if f <= 5 {
                row.extend(std::iter::repeat(3u8).take(2));
            }
            owners.push(owner_plane(&row));
        }
        let history = FrameHistory {
            owners: &owners,
            num_players: 3,
        };
        let result = rank(&history);
        assert_eq!(result.ranks, vec![1, 0, 2]);
        assert_eq!(result.last_alive, vec![8, (owners.len() - 1) as i64, 5]);
    }

    #[test]
    fn single_survivor_ranks_first() {
        let owners = vec![vec![1u8, 2u8], vec![1u8, 0u8]];
        let history = FrameHistory {
            owners: &owners,
            num_players: 2,
        };
        let result = rank(&history);
        assert_eq!(result.ranks[0], 0);
        assert_eq!(result.ranks[1], 1);
    }
}
