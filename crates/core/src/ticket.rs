//! Support ticket entity and store contract.
//!
//! The core treats tickets as opaque records manipulated only through the
//! ticket tool's typed interface; the store itself is an external
//! collaborator (see `deskline-tickets` for backends).

use crate::error::TicketStoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ticket priority, as triaged by the assistant from the user's wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Ticket lifecycle status. New tickets start `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// A persisted help-desk ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Store-assigned identifier
    pub id: i64,

    /// One-line summary
    pub summary: String,

    pub priority: TicketPriority,

    pub category: String,

    /// Free-form problem description
    pub description: String,

    /// Contact email — unique per ticket, enforced by the store
    pub email: String,

    pub status: TicketStatus,

    pub created_on: DateTime<Utc>,

    pub updated_on: DateTime<Utc>,
}

/// The fields supplied when creating a ticket; the store assigns id,
/// status, and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDraft {
    pub summary: String,
    pub priority: TicketPriority,
    pub category: String,
    pub description: String,
    pub email: String,
}

/// The ticket store collaborator interface.
///
/// At-least-once semantics are acceptable: the model may retry a tool call
/// after seeing a transient failure, and a duplicate create fails on the
/// unique email rather than double-inserting.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Look up the ticket registered under a contact email, if any.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> std::result::Result<Option<Ticket>, TicketStoreError>;

    /// Create a new ticket. Fails with [`TicketStoreError::DuplicateEmail`]
    /// when one already exists for the draft's email.
    async fn create(&self, draft: TicketDraft) -> std::result::Result<Ticket, TicketStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&TicketPriority::Urgent).unwrap(),
            "\"URGENT\""
        );
        let p: TicketPriority = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(p, TicketPriority::Low);
    }

    #[test]
    fn status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
    }

    #[test]
    fn ticket_roundtrip() {
        let ticket = Ticket {
            id: 7,
            summary: "Cannot log in".into(),
            priority: TicketPriority::High,
            category: "auth".into(),
            description: "Login fails with a 500 after password reset".into(),
            email: "a@b.com".into(),
            status: TicketStatus::Open,
            created_on: Utc::now(),
            updated_on: Utc::now(),
        };
        let json = serde_json::to_string(&ticket).unwrap();
        let back: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, 7);
        assert_eq!(back.email, "a@b.com");
        assert_eq!(back.status, TicketStatus::Open);
    }
}
