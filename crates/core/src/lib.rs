//! # Deskline Core
//!
//! Domain types, traits, and error definitions for the Deskline help-desk
//! assistant.
//!
//! Every collaborator the orchestration loop touches — the model provider,
//! conversation memory, the tool registry, the ticket store — is a trait
//! defined here; concrete backends live in their own crates and depend
//! inward on this one. The crate carries no HTTP or storage dependencies,
//! so swapping a backend or mocking one in tests never drags a framework
//! along.

pub mod error;
pub mod message;
pub mod provider;
pub mod store;
pub mod ticket;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, MemoryError, ProviderError, Result, TicketStoreError, ToolError};
pub use message::{ChatMessage, ConversationId, MessageToolCall, Role, ToolCallRecord, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, ToolDefinition};
pub use store::ConversationStore;
pub use ticket::{Ticket, TicketDraft, TicketPriority, TicketStatus, TicketStore};
pub use tool::{Tool, ToolCall, ToolContext, ToolRegistry, ToolResult};
