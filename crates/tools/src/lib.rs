//! Built-in tool implementations for the Deskline assistant.
//!
//! Two capabilities, matching what the help desk actually needs:
//! the current date/time in the caller's zone, and support-ticket
//! lookup/creation against the ticket store.

pub mod datetime;
pub mod ticket;

use deskline_core::ticket::TicketStore;
use deskline_core::tool::ToolRegistry;
use std::sync::Arc;

pub use datetime::CurrentDateTimeTool;
pub use ticket::TicketTool;

/// Build the registry with both help-desk tools. Called once at startup;
/// the registry is immutable and shared afterwards.
pub fn default_registry(ticket_store: Arc<dyn TicketStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CurrentDateTimeTool));
    registry.register(Box::new(TicketTool::new(ticket_store)));
    registry
}
