use arena_core::{Direction, GameError, PlayerId};

/// Parses a bot's raw move line into a dense `(height, width)` grid of
/// directions, defaulting every untouched cell to [`Direction::Still`].
///
/// The line is `x y d` triples, space-separated, in any order and any
/// count — including zero, which means "everything stays put". A triple
/// is silently dropped (not an error) if `(x, y)` is out of bounds or the
/// owner plane shows a different player at that cell; only the submitting
/// bot can move its own pieces. The token count must be a multiple of
/// three, and every token must parse as an integer, or the whole line is
/// rejected.
pub fn decode_moves(
    line: &str,
    bot_id: PlayerId,
    owner: &[u8],
    width: u16,
    height: u16,
) -> Result<Vec<Direction>, GameError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() % 3 != 0 {
        return Err(GameError::ProtocolError {
            bot_id,
            reason: format!("move line has {} tokens, not a multiple of 3", tokens.len()),
        });
    }

    let mut ints = Vec::with_capacity(tokens.len());
    for tok in &tokens {
        let v: i64 = tok.parse().map_err(|_| GameError::ProtocolError {
            bot_id,
            reason: format!("non-integer token in move line: {:?}", tok),
        })?;
        ints.push(v);
    }

    let mut grid = vec![Direction::Still; width as usize * height as usize];
    for triple in ints.chunks_exact(3) {
        let (x, y, d) = (triple[0], triple[1], triple[2]);
        if x < 0 || x >= width as i64 || y < 0 || y >= height as i64 {
            continue;
        }
        let idx = y as usize * width as usize + x as usize;
        if owner[idx] != bot_id {
            continue;
        }
        let dir = match Direction::try_from(d as u8) {
            Ok(dir) => dir,
            Err(_) => continue,
        };
        grid[idx] = dir;
    }

    Ok(grid)
}
