use std::sync::{Arc, Mutex};
use std::time::Duration;

use arena_core::{GameError, Phase, PlayerId};
use tokio::task::JoinHandle;

use crate::handle::{BotSpec, ProcessHandle, ProcessReader, ProcessSpawner, ProcessWriter};
use crate::pump::{self, PumpMessage};
use crate::state::SessionState;

const PUMP_JOIN_TIMEOUT: Duration = Duration::from_secs(1);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(10);
const READY_TIMEOUT: Duration = Duration::from_secs(3);

/// A running bot: the process handle's write half, the pump's receiver, and
/// the state machine gating which operations are legal right now.
pub struct BotSession {
    bot_id: PlayerId,
    state: SessionState,
    writer: Box<dyn ProcessWriter>,
    rx: tokio::sync::mpsc::Receiver<PumpMessage>,
    pump: Option<JoinHandle<()>>,
    stderr: Arc<Mutex<Vec<u8>>>,
}

impl BotSession {
    /// Walks a bot through its full setup lifecycle (`Created ->
    /// ImagePresent -> Started -> Running`): pulls the image if missing,
    /// starts the container, then attaches and waits for readiness. This is
    /// the constructor real callers should use.
    pub async fn spawn(
        bot_id: PlayerId,
        spawner: &dyn ProcessSpawner,
        spec: &BotSpec,
    ) -> Result<Self, GameError> {
        log::debug!("bot {bot_id}: ensuring image {}", spec.image);
        spawner.ensure_image(spec).await?;
        log::debug!("bot {bot_id}: starting container");
        let handle = spawner.start(spec).await?;
        Self::attach(bot_id, handle).await
    }

    /// Splits an already-started process handle into its pump and session
    /// halves. Walks the state machine from `Created` through `Started`
    /// (the caller is expected to have already run `ensure_image`/`start`;
    /// see [`Self::spawn`], which does this for you), waits for the
    /// process to report ready (poll every 10ms, timeout after 3s), then
    /// advances to `Running`.
    pub async fn attach(bot_id: PlayerId, mut handle: Box<dyn ProcessHandle>) -> Result<Self, GameError> {
        let mut state = SessionState::Created;
        state = Self::advance(bot_id, state, SessionState::ImagePresent)?;
        state = Self::advance(bot_id, state, SessionState::Started)?;
        handle.wait_ready(READY_POLL_INTERVAL, READY_TIMEOUT).await?;
        state = Self::advance(bot_id, state, SessionState::Running)?;

        let (reader, writer): (Box<dyn ProcessReader>, Box<dyn ProcessWriter>) = handle.split();
        let stderr = Arc::new(Mutex::new(Vec::new()));
        let (rx, pump) = pump::spawn_pump(reader, stderr.clone());
        log::info!("bot {bot_id}: session running");
        Ok(BotSession {
            bot_id,
            state,
            writer,
            rx,
            pump: Some(pump),
            stderr,
        })
    }

    /// Validates a state transition against [`SessionState::can_advance_to`]
    /// rather than assuming it; a session that somehow skips a phase fails
    /// loudly instead of silently landing in `Running`.
    fn advance(bot_id: PlayerId, state: SessionState, next: SessionState) -> Result<SessionState, GameError> {
        if state.can_advance_to(next) {
            Ok(next)
        } else {
            Err(GameError::SessionError {
                bot_id,
                cause: format!("illegal session transition {} -> {}", state, next),
            })
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn bot_id(&self) -> PlayerId {
        self.bot_id
    }

    /// Bytes the process has written to stderr so far, for error reporting.
    pub fn stderr_snapshot(&self) -> Vec<u8> {
        self.stderr.lock().unwrap().clone()
    }

    fn require_running(&self) -> Result<(), GameError> {
        if self.state == SessionState::Running {
            Ok(())
        } else {
            Err(GameError::SessionError {
                bot_id: self.bot_id,
                cause: format!("session not running (state: {})", self.state),
            })
        }
    }

    /// Writes one line to the bot's stdin, appending `\n` if the caller left
    /// it off.
    pub async fn write_line(&mut self, line: &str) -> Result<(), GameError> {
        self.require_running()?;
        let mut bytes = line.as_bytes().to_vec();
        if bytes.last() != Some(&b'\n') {
            bytes.push(b'\n');
        }
        self.writer.write_all(&bytes).await
    }

    /// Waits up to `timeout` for the next complete stdout line.
    pub async fn read_line(&mut self, timeout: Duration) -> Result<String, GameError> {
        self.require_running()?;
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(PumpMessage::Line(line))) => Ok(line),
            Ok(Some(PumpMessage::Error(cause))) => Err(GameError::SessionError {
                bot_id: self.bot_id,
                cause,
            }),
            Ok(Some(PumpMessage::EndOfStream)) | Ok(None) => Err(GameError::Shutdown),
            Err(_) => {
                log::warn!("bot {}: timed out waiting {:?} for a line", self.bot_id, timeout);
                Err(GameError::Timeout {
                    bot_id: self.bot_id,
                    phase: Phase::Frame,
                })
            }
        }
    }

    /// Half-closes stdin, waits briefly for the pump to drain, then stops the
    /// underlying process. Always ends in `Closed`, even if the process was
    /// already gone.
    pub async fn close(&mut self) -> Result<(), GameError> {
        log::debug!("bot {}: closing session", self.bot_id);
        self.state = SessionState::Closing;
        let _ = self.writer.shutdown_write().await;
        if let Some(pump) = self.pump.take() {
            if tokio::time::timeout(PUMP_JOIN_TIMEOUT, pump).await.is_err() {
                log::warn!("bot {}: reader pump did not join within {:?}", self.bot_id, PUMP_JOIN_TIMEOUT);
            }
        }
        let result = self.writer.stop().await;
        self.state = SessionState::Closed;
        log::info!("bot {}: session closed", self.bot_id);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::StreamChunk;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    struct FakeReader {
        chunks: VecDeque<Result<Option<StreamChunk>, GameError>>,
    }

    #[async_trait]
    impl ProcessReader for FakeReader {
        async fn read_chunk(&mut self) -> Result<Option<StreamChunk>, GameError> {
            self.chunks.pop_front().unwrap_or(Ok(None))
        }
    }

    struct FakeWriter {
        written: Arc<Mutex<Vec<u8>>>,
        stopped: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl ProcessWriter for FakeWriter {
        async fn write_all(&mut self, bytes: &[u8]) -> Result<(), GameError> {
            self.written.lock().unwrap().extend_from_slice(bytes);
            Ok(())
        }
        async fn shutdown_write(&mut self) -> Result<(), GameError> {
            Ok(())
        }
        async fn stop(&mut self) -> Result<(), GameError> {
            *self.stopped.lock().unwrap() = true;
            Ok(())
        }
    }

    struct FakeHandle {
        reader: FakeReader,
        writer: FakeWriter,
    }

    #[async_trait]
    impl ProcessHandle for FakeHandle {
        async fn wait_ready(&mut self, _poll_interval: Duration, _timeout: Duration) -> Result<(), GameError> {
            Ok(())
        }
        fn split(self: Box<Self>) -> (Box<dyn ProcessReader>, Box<dyn ProcessWriter>) {
            (Box::new(self.reader), Box::new(self.writer))
        }
    }

    fn echo_handle(echoed: &str) -> FakeHandle {
        FakeHandle {
            reader: FakeReader {
                chunks: VecDeque::from(vec![
                    Ok(Some(StreamChunk::Stdout(echoed.as_bytes().to_vec()))),
                    Ok(None),
                ]),
            },
            writer: FakeWriter {
                written: Arc::new(Mutex::new(Vec::new())),
                stopped: Arc::new(Mutex::new(false)),
            },
        }
    }

    #[tokio::test]
    async fn write_then_read_round_trips_a_line() {
        let handle = echo_handle("hello\n");
        let mut session = BotSession::attach(1, Box::new(handle)).await.unwrap();

        session.write_line("hello").await.unwrap();
        let line = session
            .read_line(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(line, "hello\n");
    }

    #[tokio::test]
    async fn write_line_appends_missing_newline() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let handle = FakeHandle {
            reader: FakeReader {
                chunks: VecDeque::from(vec![Ok(None)]),
            },
            writer: FakeWriter {
                written: written.clone(),
                stopped: Arc::new(Mutex::new(false)),
            },
        };
        let mut session = BotSession::attach(1, Box::new(handle)).await.unwrap();
        session.write_line("no-newline").await.unwrap();
        assert_eq!(&*written.lock().unwrap(), b"no-newline\n");
    }

    #[tokio::test]
    async fn read_line_times_out_when_nothing_arrives() {
        let handle = FakeHandle {
            reader: FakeReader {
                chunks: VecDeque::new(),
            },
            writer: FakeWriter {
                written: Arc::new(Mutex::new(Vec::new())),
                stopped: Arc::new(Mutex::new(false)),
            },
        };
        let mut session = BotSession::attach(2, Box::new(handle)).await.unwrap();
        let err = session
            .read_line(Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::Timeout { bot_id: 2, phase: Phase::Frame }));
    }

    #[tokio::test]
    async fn close_stops_the_process_and_advances_to_closed() {
        let stopped = Arc::new(Mutex::new(false));
        let handle = FakeHandle {
            reader: FakeReader {
                chunks: VecDeque::from(vec![Ok(None)]),
            },
            writer: FakeWriter {
                written: Arc::new(Mutex::new(Vec::new())),
                stopped: stopped.clone(),
            },
        };
        let mut session = BotSession::attach(3, Box::new(handle)).await.unwrap();
        session.close().await.unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(*stopped.lock().unwrap());
    }

    #[tokio::test]
    async fn operations_after_close_are_rejected() {
        let handle = FakeHandle {
            reader: FakeReader {
                chunks: VecDeque::from(vec![Ok(None)]),
            },
            writer: FakeWriter {
                written: Arc::new(Mutex::new(Vec::new())),
                stopped: Arc::new(Mutex::new(false)),
            },
        };
        let mut session = BotSession::attach(4, Box::new(handle)).await.unwrap();
        session.close().await.unwrap();
        let err = session.write_line("too late").await.unwrap_err();
        assert!(matches!(err, GameError::SessionError { bot_id: 4, .. }));
    }

    struct FakeSpawner {
        ensure_image_calls: Arc<Mutex<u32>>,
        start_calls: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl ProcessSpawner for FakeSpawner {
        async fn ensure_image(&self, _spec: &BotSpec) -> Result<(), GameError> {
            *self.ensure_image_calls.lock().unwrap() += 1;
            Ok(())
        }
        async fn start(&self, _spec: &BotSpec) -> Result<Box<dyn ProcessHandle>, GameError> {
            *self.start_calls.lock().unwrap() += 1;
            Ok(Box::new(echo_handle("ready\n")))
        }
    }

    #[tokio::test]
    async fn spawn_pulls_the_image_and_starts_before_running() {
        let ensure_image_calls = Arc::new(Mutex::new(0));
        let start_calls = Arc::new(Mutex::new(0));
        let spawner = FakeSpawner {
            ensure_image_calls: ensure_image_calls.clone(),
            start_calls: start_calls.clone(),
        };
        let spec = BotSpec {
            image: "bot:latest".into(),
            gpu: false,
        };
        let mut session = BotSession::spawn(5, &spawner, &spec).await.unwrap();
        assert_eq!(*ensure_image_calls.lock().unwrap(), 1);
        assert_eq!(*start_calls.lock().unwrap(), 1);
        assert_eq!(session.state(), SessionState::Running);

        let line = session.read_line(Duration::from_secs(1)).await.unwrap();
        assert_eq!(line, "ready\n");
    }
}
