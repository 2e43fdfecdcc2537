use std::time::Duration;

use arena_core::{GameError, PlayerId};
use async_trait::async_trait;

/// One seat's line-oriented I/O, abstracted away from however it is backed.
/// [`arena_session::BotSession`] is the production implementation; tests and
/// the demo binary can swap in trivial in-process bots instead.
#[async_trait]
pub trait Bot: Send {
    fn bot_id(&self) -> PlayerId;
    async fn write_line(&mut self, line: &str) -> Result<(), GameError>;
    async fn read_line(&mut self, timeout: Duration) -> Result<String, GameError>;
    async fn close(&mut self) -> Result<(), GameError>;
}

#[async_trait]
impl Bot for arena_session::BotSession {
    fn bot_id(&self) -> PlayerId {
        arena_session::BotSession::bot_id(self)
    }
    async fn write_line(&mut self, line: &str) -> Result<(), GameError> {
        arena_session::BotSession::write_line(self, line).await
    }
    async fn read_line(&mut self, timeout: Duration) -> Result<String, GameError> {
        arena_session::BotSession::read_line(self, timeout).await
    }
    async fn close(&mut self) -> Result<(), GameError> {
        arena_session::BotSession::close(self).await
    }
}

/// An always-idle bot: reports its name once during init, then replies with
/// an empty move line (all STILL) to every frame. Used to exercise the
/// driver without a real subprocess.
pub struct StillBot {
    bot_id: PlayerId,
    reported_name: String,
    named: bool,
}

impl StillBot {
    pub fn new(bot_id: PlayerId, reported_name: impl Into<String>) -> Self {
        Self {
            bot_id,
            reported_name: reported_name.into(),
            named: false,
        }
    }
}

#[async_trait]
impl Bot for StillBot {
    fn bot_id(&self) -> PlayerId {
        self.bot_id
    }
    async fn write_line(&mut self, _line: &str) -> Result<(), GameError> {
        Ok(())
    }
    async fn read_line(&mut self, _timeout: Duration) -> Result<String, GameError> {
        if !self.named {
            self.named = true;
            Ok(format!("{}\n", self.reported_name))
        } else {
            Ok("\n".to_string())
        }
    }
    async fn close(&mut self) -> Result<(), GameError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn still_bot_reports_its_name_on_the_init_line() {
        let mut bot = StillBot::new(1, "fish");
        let line = bot.read_line(Duration::from_millis(10)).await.unwrap();
        assert_eq!(line, "fish\n");
    }

    #[tokio::test]
    async fn still_bot_accepts_any_write_and_replies_with_an_empty_move_line_next() {
        let mut bot = StillBot::new(2, "still");
        bot.write_line("4 0 1 1 4 0 0 0 0 0 0 0 0 0").await.unwrap();
        let _ = bot.read_line(Duration::from_millis(10)).await.unwrap();
    }
}
