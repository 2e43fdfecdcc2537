use arena_core::GameError;
use async_trait::async_trait;
use std::time::Duration;

/// One chunk read off a process's multiplexed stdout/stderr.
#[derive(Debug, Clone)]
pub enum StreamChunk {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
}

/// Write half of an attached process, held by the session for its whole
/// lifetime — including the final container stop + removal.
#[async_trait]
pub trait ProcessWriter: Send {
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), GameError>;
    async fn shutdown_write(&mut self) -> Result<(), GameError>;
    async fn stop(&mut self) -> Result<(), GameError>;
}

/// Read half of an attached process, moved into the reader pump task.
#[async_trait]
pub trait ProcessReader: Send {
    /// Reads the next chunk. `Ok(None)` means the stream ended cleanly.
    async fn read_chunk(&mut self) -> Result<Option<StreamChunk>, GameError>;
}

/// What a session needs from whatever actually spawned and attached to the
/// isolated process. Real container/process plumbing is a caller concern —
/// this crate only consumes the trait.
#[async_trait]
pub trait ProcessHandle: Send {
    /// Polls until the process's first live PID appears, or times out.
    async fn wait_ready(&mut self, poll_interval: Duration, timeout: Duration) -> Result<(), GameError>;
    /// Splits into independent read/write halves, the way `tokio::io::split`
    /// does for a duplex stream. The writer half also owns `stop`.
    fn split(self: Box<Self>) -> (Box<dyn ProcessReader>, Box<dyn ProcessWriter>);
}

/// Identifies a bot's container image and any capability requests for it.
///
/// `gpu` is consumed only as a hint by whatever implements
/// [`ProcessSpawner`] — real device attachment belongs to the container
/// runtime, not this crate.
#[derive(Debug, Clone)]
pub struct BotSpec {
    pub image: String,
    pub gpu: bool,
}

/// Spawns a [`ProcessHandle`] for a bot image. Pulling the image, GPU
/// device requests, and the rest of the container runtime live behind this
/// trait, not in this crate.
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    async fn ensure_image(&self, spec: &BotSpec) -> Result<(), GameError>;
    async fn start(&self, spec: &BotSpec) -> Result<Box<dyn ProcessHandle>, GameError>;
}
