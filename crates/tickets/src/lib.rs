//! Ticket store backends for Deskline.
//!
//! The ticket store is the one real persistence concern in the system;
//! the assistant only ever touches it through the ticket tool.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryTicketStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTicketStore;
