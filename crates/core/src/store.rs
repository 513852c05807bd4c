//! ConversationStore trait — durable per-conversation turn history.
//!
//! Maps a [`ConversationId`] to an ordered sequence of [`Turn`]s, used to
//! reconstruct context on every call. Ordering is strictly append order.

use crate::error::MemoryError;
use crate::message::{ConversationId, Turn};
use async_trait::async_trait;

/// The conversation memory contract.
///
/// Concurrency: appends to the *same* conversation id must be atomic with
/// respect to each other; operations on *different* ids are fully
/// independent — implementations must not serialize across ids.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Add a turn to the end of the conversation's sequence, creating the
    /// sequence implicitly on first use.
    async fn append(
        &self,
        id: &ConversationId,
        turn: Turn,
    ) -> std::result::Result<(), MemoryError>;

    /// All turns so far, oldest first. An unseen id yields an empty
    /// sequence, never an error.
    async fn load(&self, id: &ConversationId) -> std::result::Result<Vec<Turn>, MemoryError>;
}
