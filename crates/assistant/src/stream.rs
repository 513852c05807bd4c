//! Events yielded by a streaming invocation.

use serde::{Deserialize, Serialize};

/// One item in the streaming response sequence.
///
/// Consumers only ever see text in `Chunk`; tool round-trips happen
/// silently between chunks. A failure after partial output terminates the
/// sequence with `Error` — including the case where nothing was emitted
/// yet, so an up-front model failure yields an error-terminated empty
/// sequence rather than an empty success.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantEvent {
    /// An incremental fragment of the answer text.
    Chunk { content: String },

    /// The answer is complete and both turns are recorded in memory.
    Done { round_trips: u32 },

    /// The invocation failed; no further events follow.
    Error { message: String },
}
