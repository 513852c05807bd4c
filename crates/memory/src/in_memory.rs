//! In-memory conversation store.
//!
//! Matches the reference deployment: history lives for the lifetime of the
//! process. Locking is two-level so the per-key atomicity contract holds
//! without a cross-key lock:
//!
//! - the outer map lock is held only long enough to fetch or create the
//!   per-conversation slot;
//! - each conversation's turn list sits behind its own mutex, so appends
//!   to the same id are atomic while different ids never contend.

use async_trait::async_trait;
use deskline_core::error::MemoryError;
use deskline_core::message::{ConversationId, Turn};
use deskline_core::store::ConversationStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// An in-memory store mapping conversation ids to turn sequences.
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<ConversationId, Arc<Mutex<Vec<Turn>>>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch the slot for an id, creating it if this is the first use.
    async fn slot(&self, id: &ConversationId) -> Arc<Mutex<Vec<Turn>>> {
        {
            let map = self.conversations.read().await;
            if let Some(slot) = map.get(id) {
                return slot.clone();
            }
        }
        let mut map = self.conversations.write().await;
        map.entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(
        &self,
        id: &ConversationId,
        turn: Turn,
    ) -> std::result::Result<(), MemoryError> {
        let slot = self.slot(id).await;
        slot.lock().await.push(turn);
        Ok(())
    }

    async fn load(&self, id: &ConversationId) -> std::result::Result<Vec<Turn>, MemoryError> {
        let slot = {
            let map = self.conversations.read().await;
            map.get(id).cloned()
        };
        match slot {
            Some(slot) => Ok(slot.lock().await.clone()),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskline_core::message::Role;

    #[tokio::test]
    async fn unseen_id_loads_empty() {
        let store = InMemoryConversationStore::new();
        let turns = store.load(&ConversationId::from("never-seen")).await.unwrap();
        assert!(turns.is_empty());
    }

    #[tokio::test]
    async fn append_preserves_order() {
        let store = InMemoryConversationStore::new();
        let id = ConversationId::from("c1");

        store.append(&id, Turn::user("first")).await.unwrap();
        store
            .append(&id, Turn::assistant("second", vec![]))
            .await
            .unwrap();
        store.append(&id, Turn::user("third")).await.unwrap();

        let turns = store.load(&id).await.unwrap();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].content, "first");
        assert_eq!(turns[1].content, "second");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[2].content, "third");
    }

    #[tokio::test]
    async fn ids_are_independent() {
        let store = InMemoryConversationStore::new();
        store
            .append(&ConversationId::from("a"), Turn::user("for a"))
            .await
            .unwrap();

        let other = store.load(&ConversationId::from("b")).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_lose_no_writes() {
        let store = Arc::new(InMemoryConversationStore::new());
        let id = ConversationId::from("hot");

        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store.append(&id, Turn::user(format!("turn {i}"))).await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let turns = store.load(&id).await.unwrap();
        assert_eq!(turns.len(), 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_across_ids() {
        let store = Arc::new(InMemoryConversationStore::new());

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let id = ConversationId::from(format!("conv-{i}").as_str());
                for j in 0..10 {
                    store
                        .append(&id, Turn::user(format!("msg {j}")))
                        .await
                        .unwrap();
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        for i in 0..20 {
            let id = ConversationId::from(format!("conv-{i}").as_str());
            assert_eq!(store.load(&id).await.unwrap().len(), 10);
        }
    }
}
