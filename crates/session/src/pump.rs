use std::sync::{Arc, Mutex};

use arena_core::GameError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::handle::{ProcessReader, StreamChunk};

/// What the reader pump hands back to the session, line by line.
#[derive(Debug, Clone)]
pub enum PumpMessage {
    /// A complete stdout line, including its trailing `\n`.
    Line(String),
    /// The stream failed; no more messages will follow.
    Error(String),
    /// The stream ended cleanly; no more messages will follow.
    EndOfStream,
}

const PUMP_CHANNEL_CAPACITY: usize = 64;

/// Spawns the dedicated reader task: pulls chunks off `reader`, buffers
/// stdout bytes until a `\n` shows up and emits a [`PumpMessage::Line`] for
/// each, appends stderr bytes to the shared `stderr` buffer, and signals
/// termination with `Error` or `EndOfStream` before the task exits.
pub fn spawn_pump(
    mut reader: Box<dyn ProcessReader>,
    stderr: Arc<Mutex<Vec<u8>>>,
) -> (mpsc::Receiver<PumpMessage>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(PUMP_CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::new();
        loop {
            match reader.read_chunk().await {
                Ok(Some(StreamChunk::Stdout(bytes))) => {
                    buf.extend_from_slice(&bytes);
                    while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                        let line: Vec<u8> = buf.drain(..=pos).collect();
                        let line = String::from_utf8_lossy(&line).into_owned();
                        if tx.send(PumpMessage::Line(line)).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(Some(StreamChunk::Stderr(bytes))) => {
                    stderr.lock().unwrap().extend_from_slice(&bytes);
                }
                Ok(None) => {
                    log::debug!("reader pump: stream ended cleanly");
                    let _ = tx.send(PumpMessage::EndOfStream).await;
                    return;
                }
                Err(e) => {
                    log::warn!("reader pump: stream failed: {e}");
                    let _ = tx.send(PumpMessage::Error(e.to_string())).await;
                    return;
                }
            }
        }
    });

    (rx, handle)
}
