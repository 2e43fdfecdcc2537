/// Which handshake a bot timed out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Frame,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Init => write!(f, "init"),
            Phase::Frame => write!(f, "frame"),
        }
    }
}

/// The five error kinds a match can surface, per the engine contract.
#[derive(Debug, Clone)]
pub enum GameError {
    /// A bot failed to answer within its allotted window.
    Timeout { bot_id: u8, phase: Phase },
    /// A bot's move line was malformed (bad triple count, non-integer token).
    ProtocolError { bot_id: u8, reason: String },
    /// The container, image, or socket backing a session failed.
    SessionError { bot_id: u8, cause: String },
    /// A cooperative close propagated through a read.
    Shutdown,
    /// `(W, H, P)` could not produce a valid board.
    GenerationError(String),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Timeout { bot_id, phase } => {
                write!(f, "bot {} timed out during {}", bot_id, phase)
            }
            GameError::ProtocolError { bot_id, reason } => {
                write!(f, "bot {} sent malformed output: {}", bot_id, reason)
            }
            GameError::SessionError { bot_id, cause } => {
                write!(f, "bot {} session failure: {}", bot_id, cause)
            }
            GameError::Shutdown => write!(f, "session closed cooperatively"),
            GameError::GenerationError(reason) => write!(f, "map generation failed: {}", reason),
        }
    }
}

impl std::error::Error for GameError {}
