use arena_core::GameError;

/// A `(owner, strength)` snapshot of the board, shaped `(height, width)`
/// and stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub owner: Vec<u8>,
    pub strength: Vec<u8>,
}

impl Frame {
    pub fn new(width: u16, height: u16, owner: Vec<u8>, strength: Vec<u8>) -> Self {
        debug_assert_eq!(owner.len(), width as usize * height as usize);
        debug_assert_eq!(strength.len(), width as usize * height as usize);
        Self {
            width,
            height,
            owner,
            strength,
        }
    }

    /// Encodes as: run-length `(count, owner)` pairs covering every cell,
    /// followed by every strength value, all space-separated decimal.
    pub fn encode(&self) -> String {
        let size = self.owner.len();
        let mut tokens: Vec<String> = Vec::with_capacity(size / 2 + size);
        let mut i = 0;
        while i < size {
            let owner = self.owner[i];
            let mut count = 1usize;
            while i + count < size && self.owner[i + count] == owner {
                count += 1;
            }
            tokens.push(count.to_string());
            tokens.push(owner.to_string());
            i += count;
        }
        for s in &self.strength {
            tokens.push(s.to_string());
        }
        tokens.join(" ")
    }

    /// Inverse of [`Frame::encode`]. Fails if the run-length counts don't
    /// sum to exactly `width * height`, or the strength tail is the wrong
    /// length.
    pub fn decode(s: &str, width: u16, height: u16) -> Result<Frame, GameError> {
        let size = width as usize * height as usize;
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let mut ints = Vec::with_capacity(tokens.len());
        for tok in &tokens {
            let v: i64 = tok.parse().map_err(|_| GameError::ProtocolError {
                bot_id: 0,
                reason: format!("non-integer token in frame: {:?}", tok),
            })?;
            ints.push(v);
        }

        let mut owner = Vec::with_capacity(size);
        let mut idx = 0;
        while owner.len() < size {
            if idx + 1 >= ints.len() {
                return Err(GameError::ProtocolError {
                    bot_id: 0,
                    reason: "frame ended before owner plane was covered".into(),
                });
            }
            let count = ints[idx];
            let value = ints[idx + 1];
            idx += 2;
            if count <= 0 {
                return Err(GameError::ProtocolError {
                    bot_id: 0,
                    reason: format!("non-positive run length: {}", count),
                });
            }
            for _ in 0..count {
                owner.push(value as u8);
            }
        }
        if owner.len() != size {
            return Err(GameError::ProtocolError {
                bot_id: 0,
                reason: format!(
                    "owner run lengths summed to {}, expected {}",
                    owner.len(),
                    size
                ),
            });
        }

        let strength_tokens = &ints[idx..];
        if strength_tokens.len() != size {
            return Err(GameError::ProtocolError {
                bot_id: 0,
                reason: format!(
                    "strength tail had {} values, expected {}",
                    strength_tokens.len(),
                    size
                ),
            });
        }
        let strength = strength_tokens.iter().map(|&v| v as u8).collect();

        Ok(Frame::new(width, height, owner, strength))
    }
}
