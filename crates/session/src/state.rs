/// A bot session's lifecycle. Transitions only move forward; `close` is the
/// only way out of `Running`, and it always ends in `Closed` even if the
/// underlying process misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    ImagePresent,
    Started,
    Running,
    Closing,
    Closed,
}

impl SessionState {
    /// Whether `next` is a legal transition from this state.
    pub fn can_advance_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Created, ImagePresent)
                | (ImagePresent, Started)
                | (Started, Running)
                | (Running, Closing)
                | (Closing, Closed)
        )
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionState::Created => "created",
            SessionState::ImagePresent => "image_present",
            SessionState::Started => "started",
            SessionState::Running => "running",
            SessionState::Closing => "closing",
            SessionState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionState::*;

    #[test]
    fn walks_the_happy_path_in_order() {
        assert!(Created.can_advance_to(ImagePresent));
        assert!(ImagePresent.can_advance_to(Started));
        assert!(Started.can_advance_to(Running));
        assert!(Running.can_advance_to(Closing));
        assert!(Closing.can_advance_to(Closed));
    }

    #[test]
    fn rejects_skipping_a_state() {
        assert!(!Created.can_advance_to(Started));
        assert!(!Running.can_advance_to(Closed));
    }

    #[test]
    fn rejects_moving_backward() {
        assert!(!Running.can_advance_to(Created));
        assert!(!Closed.can_advance_to(Running));
    }
}
