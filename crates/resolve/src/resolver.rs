use arena_core::Direction;
use arena_mapgen::GameMap;

use crate::stats::{StatKind, Stats};

const ALL_DIRECTIONS: [Direction; 5] = [
    Direction::Still,
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

const STRENGTH_CAP: i32 = 255;

/// Runs one full turn: apply moves, grow production, compute injuries,
/// resolve combat, rebuild the map. `moves[p]` is a dense row-major
/// `(height * width)` direction grid for player `p`; `moves.len()` is the
/// player count for this turn.
///
/// Mutates `map` in place and returns the stat deltas earned this turn.
pub fn resolve(map: &mut GameMap, moves: &[Vec<Direction>]) -> Stats {
    let h = map.height as usize;
    let w = map.width as usize;
    let p_count = moves.len();
    let size = h * w;
    let mut stats = Stats::new(p_count);

    let mut pieces = apply_moves(map, moves, h, w, p_count, &mut stats);
    let (injuries, injure_map) = compute_injuries(map, &pieces, h, w, p_count, &mut stats);
    resolve_combat(&mut pieces, &injuries, p_count, size, &mut stats);
    rebuild(map, &pieces, &injure_map, p_count, size, &mut stats);

    stats
}

fn apply_moves(
    map: &mut GameMap,
    moves: &[Vec<Direction>],
    h: usize,
    w: usize,
    p_count: usize,
    stats: &mut Stats,
) -> Vec<Vec<i32>> {
    let size = h * w;
    let mut pieces = vec![vec![-1i32; size]; p_count];
    let mut moved = vec![vec![false; size]; p_count];

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            for p in 0..p_count {
                let dir = moves[p][idx];
                if dir == Direction::Still {
                    continue;
                }
                moved[p][idx] = true;
                let strength = map.strength[idx] as i32;
                if pieces[p][idx] == -1 {
                    pieces[p][idx] = 0;
                }
                map.strength[idx] = 0;
                map.owner[idx] = 0;

                let (ny, nx) = dir.step(y, x, h, w);
                let nidx = ny * w + nx;
                if pieces[p][nidx] == -1 {
                    pieces[p][nidx] = 0;
                }
                pieces[p][nidx] += strength;
                if pieces[p][nidx] > STRENGTH_CAP {
                    let lost = pieces[p][nidx] - STRENGTH_CAP;
                    stats.add(p, StatKind::MovementCapLoss, lost);
                    pieces[p][nidx] = STRENGTH_CAP;
                }
            }
        }
    }

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            for p in 0..p_count {
                if moved[p][idx] {
                    continue;
                }
                if map.owner[idx] as usize != p + 1 {
                    continue;
                }
                if pieces[p][idx] == -1 {
                    pieces[p][idx] = 0;
                }
                let production = map.production[idx] as i32;
                let leftover = map.strength[idx] as i32;
                pieces[p][idx] += production + leftover;
                stats.add(p, StatKind::RealizedProduction, production);
                if pieces[p][idx] > STRENGTH_CAP {
                    let lost = pieces[p][idx] - STRENGTH_CAP;
                    stats.add(p, StatKind::ProductionCapLoss, lost);
                    stats.add(p, StatKind::RealizedProduction, -lost);
                    pieces[p][idx] = STRENGTH_CAP;
                }
                map.strength[idx] = 0;
                map.owner[idx] = 0;
            }
        }
    }

    pieces
}

fn compute_injuries(
    map: &GameMap,
    pieces: &[Vec<i32>],
    h: usize,
    w: usize,
    p_count: usize,
    stats: &mut Stats,
) -> (Vec<Vec<i32>>, Vec<i32>) {
    let size = h * w;
    let mut injuries = vec![vec![-1i32; size]; p_count];
    let mut injure_map = vec![0i32; size];
    let mut overkill_damage = vec![vec![0i32; size]; p_count];
    let mut overkill_taken = vec![vec![0i32; size]; p_count];

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            for p in 0..p_count {
                let strength = pieces[p][idx];
                if strength < 0 {
                    continue;
                }

                for dir in ALL_DIRECTIONS {
                    let (ny, nx) = dir.step(y, x, h, w);
                    let nidx = ny * w + nx;
                    for d in 0..p_count {
                        if d == p {
                            continue;
                        }
                        if injuries[d][nidx] == -1 {
                            injuries[d][nidx] = 0;
                        }
                        injuries[d][nidx] += strength;
                        if dir != Direction::Still {
                            overkill_damage[p][nidx] += strength;
                            overkill_taken[d][nidx] += strength;
                        }
                    }
                }

                let site_strength = map.strength[idx] as i32;
                if site_strength > 0 {
                    if injuries[p][idx] == -1 {
                        injuries[p][idx] = 0;
                    }
                    injuries[p][idx] += site_strength;
                    injure_map[idx] += strength;
                }
            }
        }
    }

    for idx in 0..size {
        for p in 0..p_count {
            if overkill_damage[p][idx] > 0 {
                for d in 0..p_count {
                    if d == p {
                        continue;
                    }
                    if pieces[d][idx] > 0 {
                        stats.add(
                            p,
                            StatKind::OverkillDamage,
                            pieces[d][idx].min(overkill_damage[p][idx]),
                        );
                    }
                }
            }
            if pieces[p][idx] > 0 && overkill_taken[p][idx] > 0 {
                stats.add(
                    p,
                    StatKind::OverkillDamageTaken,
                    pieces[p][idx].min(overkill_taken[p][idx]),
                );
            }
        }
    }

    (injuries, injure_map)
}

fn resolve_combat(
    pieces: &mut [Vec<i32>],
    injuries: &[Vec<i32>],
    p_count: usize,
    size: usize,
    stats: &mut Stats,
) {
    for idx in 0..size {
        for p in 0..p_count {
            let piece = pieces[p][idx];
            if piece < 0 {
                continue;
            }
            let injury = injuries[p][idx];
            if injury >= piece {
                stats.add(p, StatKind::DamageTaken, piece);
                pieces[p][idx] = -1;
            } else if injury >= 0 {
                stats.add(p, StatKind::DamageTaken, injury);
                pieces[p][idx] -= injury;
            }
        }
    }
}

fn rebuild(
    map: &mut GameMap,
    pieces: &[Vec<i32>],
    injure_map: &[i32],
    p_count: usize,
    size: usize,
    stats: &mut Stats,
) {
    for idx in 0..size {
        map.strength[idx] = (map.strength[idx] as i32 - injure_map[idx]).max(0) as u8;
    }

    for idx in 0..size {
        for p in 0..p_count {
            let piece = pieces[p][idx];
            if piece > -1 {
                stats.add(p, StatKind::Production, map.production[idx] as i32);
                stats.add(p, StatKind::Territory, 1);
                map.owner[idx] = (p + 1) as u8;
                stats.add(p, StatKind::Strength, piece);
                map.strength[idx] = piece as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_moves(p_count: usize, size: usize) -> Vec<Vec<Direction>> {
        vec![vec![Direction::Still; size]; p_count]
    }

    fn map_2x2() -> GameMap {
        GameMap {
            width: 2,
            height: 2,
            num_players: 2,
            seed: 0,
            owner: vec![1, 0, 0, 2],
            production: vec![1, 1, 1, 1],
            strength: vec![10, 0, 0, 10],
        }
    }

    #[test]
    fn idle_growth_never_changes_owner() {
        let mut map = map_2x2();
        for _ in 0..10 {
            let moves = still_moves(2, 4);
            resolve(&mut map, &moves);
        }
        assert_eq!(map.owner[0], 1);
        assert_eq!(map.owner[3], 2);
        // strength grows by production (1/turn) each idle turn, capped at 255
        assert_eq!(map.strength[0], 20);
        assert_eq!(map.strength[3], 20);
    }

    #[test]
    fn head_on_collision_kills_both_pieces() {
        // a 1x3 torus: player 1 at x=0 moving east, player 2 at x=2 moving
        // west, both landing on the neutral cell x=1.
        let mut map = GameMap {
            width: 3,
            height: 1,
            num_players: 2,
            seed: 0,
            owner: vec![1, 0, 2],
            production: vec![1, 1, 1],
            strength: vec![10, 0, 10],
        };
        let mut p1 = vec![Direction::Still; 3];
        p1[0] = Direction::East;
        let mut p2 = vec![Direction::Still; 3];
        p2[2] = Direction::West;

        let stats = resolve(&mut map, &[p1, p2]);

        assert_eq!(map.strength[1], 0);
        assert_eq!(map.owner[1], 0);
        assert_eq!(stats.get(0, StatKind::DamageTaken), 10);
        assert_eq!(stats.get(1, StatKind::DamageTaken), 10);
    }

    #[test]
    fn production_cap_credits_excess_to_stat() {
        let mut map = GameMap {
            width: 1,
            height: 2,
            num_players: 1,
            seed: 0,
            owner: vec![1, 1],
            production: vec![1, 1],
            strength: vec![200, 200],
        };
        // one piece moves north into the other, from (y=1,x=0) to (y=0,x=0);
        // the destination cell then also grows from its own leftover strength
        // and production, overflowing the 255 cap.
        let mut p1 = vec![Direction::Still; 2];
        p1[1] = Direction::North;
        let stats = resolve(&mut map, &[p1]);
        assert_eq!(stats.get(0, StatKind::ProductionCapLoss), 146);
        assert_eq!(map.strength[0], 255);
    }

    #[test]
    fn neutral_site_retaliation_kills_the_invading_piece() {
        let mut map = GameMap {
            width: 1,
            height: 2,
            num_players: 1,
            seed: 0,
            owner: vec![1, 0],
            production: vec![1, 1],
            strength: vec![10, 50],
        };
        // player 1 moves its strength-10 piece south into the neutral,
        // strength-50 site at (1, 0); the site outdamages and kills it.
        let mut p1 = vec![Direction::Still; 2];
        p1[0] = Direction::South;
        let stats = resolve(&mut map, &[p1]);

        assert_eq!(stats.get(0, StatKind::DamageTaken), 10);
        assert_eq!(map.owner[1], 0);
        assert_eq!(map.strength[1], 40);
    }

    #[test]
    fn random_moves_never_exceed_the_strength_cap() {
        use arena_core::Arbitrary;
        let size = 5 * 5;
        let mut map = GameMap {
            width: 5,
            height: 5,
            num_players: 2,
            seed: 0,
            owner: (0..size).map(|i| if i % 2 == 0 { 1 } else { 2 }).collect(),
            production: vec![1; size],
            strength: vec![50; size],
        };
        for _ in 0..20 {
            let moves: Vec<Vec<Direction>> = (0..2)
                .map(|_| (0..size).map(|_| Direction::random()).collect())
                .collect();
            resolve(&mut map, &moves);
            assert!(map.strength.iter().all(|&s| s <= STRENGTH_CAP as u8));
        }
    }
}
