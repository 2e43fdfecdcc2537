/// A command issued by one owned cell for one turn.
///
/// Variant order is load-bearing: the wire protocol and the dense move
/// grids both encode this as the integers `0..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Still = 0,
    North = 1,
    East = 2,
    South = 3,
    West = 4,
}

/// (dy, dx) for each [`Direction`], in declaration order.
const DELTAS: [(i64, i64); 5] = [(0, 0), (-1, 0), (0, 1), (1, 0), (0, -1)];

impl Direction {
    /// `(dy, dx)` for this direction.
    pub fn delta(self) -> (i64, i64) {
        DELTAS[self as usize]
    }

    /// Toroidal destination of a step from `(y, x)` on a `height x width` board.
    pub fn step(self, y: usize, x: usize, height: usize, width: usize) -> (usize, usize) {
        let (dy, dx) = self.delta();
        (
            crate::wrap(y as i64 + dy, height),
            crate::wrap(x as i64 + dx, width),
        )
    }
}

impl TryFrom<u8> for Direction {
    type Error = crate::GameError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Still),
            1 => Ok(Direction::North),
            2 => Ok(Direction::East),
            3 => Ok(Direction::South),
            4 => Ok(Direction::West),
            d => Err(crate::GameError::ProtocolError {
                bot_id: 0,
                reason: format!("direction out of range: {}", d),
            }),
        }
    }
}

impl crate::Arbitrary for Direction {
    fn random() -> Self {
        match rand::random_range(0..5u8) {
            0 => Direction::Still,
            1 => Direction::North,
            2 => Direction::East,
            3 => Direction::South,
            _ => Direction::West,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Still => "STILL",
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_match_spec_table() {
        assert_eq!(Direction::Still.delta(), (0, 0));
        assert_eq!(Direction::North.delta(), (-1, 0));
        assert_eq!(Direction::East.delta(), (0, 1));
        assert_eq!(Direction::South.delta(), (1, 0));
        assert_eq!(Direction::West.delta(), (0, -1));
    }

    #[test]
    fn step_wraps_off_top_edge() {
        assert_eq!(Direction::North.step(0, 5, 4, 4), (3, 5 % 4));
    }

    #[test]
    fn step_wraps_off_right_edge() {
        assert_eq!(Direction::East.step(2, 3, 4, 4), (2, 0));
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert!(Direction::try_from(5).is_err());
    }
}
