//! In-memory ticket store — useful for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use deskline_core::error::TicketStoreError;
use deskline_core::ticket::{Ticket, TicketDraft, TicketStatus, TicketStore};
use tokio::sync::Mutex;

/// A ticket store backed by a Vec. Ids are assigned sequentially.
pub struct InMemoryTicketStore {
    inner: Mutex<Inner>,
}

struct Inner {
    tickets: Vec<Ticket>,
    next_id: i64,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tickets: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> std::result::Result<Option<Ticket>, TicketStoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.tickets.iter().find(|t| t.email == email).cloned())
    }

    async fn create(&self, draft: TicketDraft) -> std::result::Result<Ticket, TicketStoreError> {
        let mut inner = self.inner.lock().await;

        if inner.tickets.iter().any(|t| t.email == draft.email) {
            return Err(TicketStoreError::DuplicateEmail(draft.email));
        }

        let now = Utc::now();
        let ticket = Ticket {
            id: inner.next_id,
            summary: draft.summary,
            priority: draft.priority,
            category: draft.category,
            description: draft.description,
            email: draft.email,
            status: TicketStatus::Open,
            created_on: now,
            updated_on: now,
        };
        inner.next_id += 1;
        inner.tickets.push(ticket.clone());
        Ok(ticket)
    }
}
