//! Bot process sessions: a typed state machine around spawning a bot
//! process, pumping its stdout into line-delimited messages, and writing
//! frames back with timeouts.
mod handle;
mod pump;
mod session;
mod state;

pub use handle::{BotSpec, ProcessHandle, ProcessReader, ProcessSpawner, ProcessWriter, StreamChunk};
pub use pump::PumpMessage;
pub use session::BotSession;
pub use state::SessionState;
