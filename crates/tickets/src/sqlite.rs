//! SQLite ticket store.
//!
//! A single `tickets` table; email uniqueness is a column constraint so a
//! retried create can never double-insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deskline_core::error::TicketStoreError;
use deskline_core::ticket::{Ticket, TicketDraft, TicketPriority, TicketStatus, TicketStore};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::info;

/// A SQLite-backed ticket store.
pub struct SqliteTicketStore {
    pool: SqlitePool,
}

impl SqliteTicketStore {
    /// Open (or create) the database at `path` and bootstrap the schema.
    /// Pass `":memory:"` for an in-process ephemeral database.
    pub async fn new(path: &str) -> Result<Self, TicketStoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| TicketStoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| TicketStoreError::Unavailable(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite ticket store initialized at {path}");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), TicketStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                summary     TEXT NOT NULL,
                priority    TEXT NOT NULL,
                category    TEXT NOT NULL,
                description TEXT NOT NULL,
                email       TEXT UNIQUE NOT NULL,
                status      TEXT NOT NULL,
                created_on  TEXT NOT NULL,
                updated_on  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| TicketStoreError::Storage(format!("tickets table: {e}")))?;

        Ok(())
    }

    fn row_to_ticket(row: &SqliteRow) -> Result<Ticket, TicketStoreError> {
        let priority: String = row.get("priority");
        let status: String = row.get("status");
        let created_on: String = row.get("created_on");
        let updated_on: String = row.get("updated_on");

        Ok(Ticket {
            id: row.get("id"),
            summary: row.get("summary"),
            priority: parse_priority(&priority)?,
            category: row.get("category"),
            description: row.get("description"),
            email: row.get("email"),
            status: parse_status(&status)?,
            created_on: parse_timestamp(&created_on)?,
            updated_on: parse_timestamp(&updated_on)?,
        })
    }
}

fn priority_str(p: TicketPriority) -> &'static str {
    match p {
        TicketPriority::Low => "LOW",
        TicketPriority::Medium => "MEDIUM",
        TicketPriority::High => "HIGH",
        TicketPriority::Urgent => "URGENT",
    }
}

fn parse_priority(s: &str) -> Result<TicketPriority, TicketStoreError> {
    match s {
        "LOW" => Ok(TicketPriority::Low),
        "MEDIUM" => Ok(TicketPriority::Medium),
        "HIGH" => Ok(TicketPriority::High),
        "URGENT" => Ok(TicketPriority::Urgent),
        other => Err(TicketStoreError::Storage(format!(
            "Unknown priority in store: {other}"
        ))),
    }
}

fn status_str(s: TicketStatus) -> &'static str {
    match s {
        TicketStatus::Open => "OPEN",
        TicketStatus::InProgress => "IN_PROGRESS",
        TicketStatus::Resolved => "RESOLVED",
        TicketStatus::Closed => "CLOSED",
    }
}

fn parse_status(s: &str) -> Result<TicketStatus, TicketStoreError> {
    match s {
        "OPEN" => Ok(TicketStatus::Open),
        "IN_PROGRESS" => Ok(TicketStatus::InProgress),
        "RESOLVED" => Ok(TicketStatus::Resolved),
        "CLOSED" => Ok(TicketStatus::Closed),
        other => Err(TicketStoreError::Storage(format!(
            "Unknown status in store: {other}"
        ))),
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TicketStoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TicketStoreError::Storage(format!("Bad timestamp in store: {e}")))
}

#[async_trait]
impl TicketStore for SqliteTicketStore {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> std::result::Result<Option<Ticket>, TicketStoreError> {
        let row = sqlx::query("SELECT * FROM tickets WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TicketStoreError::Unavailable(e.to_string()))?;

        row.as_ref().map(Self::row_to_ticket).transpose()
    }

    async fn create(&self, draft: TicketDraft) -> std::result::Result<Ticket, TicketStoreError> {
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO tickets (summary, priority, category, description, email, status, created_on, updated_on)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.summary)
        .bind(priority_str(draft.priority))
        .bind(&draft.category)
        .bind(&draft.description)
        .bind(&draft.email)
        .bind(status_str(TicketStatus::Open))
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(r) => r,
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("UNIQUE constraint failed") {
                    return Err(TicketStoreError::DuplicateEmail(draft.email));
                }
                return Err(TicketStoreError::Unavailable(msg));
            }
        };

        Ok(Ticket {
            id: result.last_insert_rowid(),
            summary: draft.summary,
            priority: draft.priority,
            category: draft.category,
            description: draft.description,
            email: draft.email,
            status: TicketStatus::Open,
            created_on: now,
            updated_on: now,
        })
    }
}
