//! Conversation memory implementations for Deskline.

pub mod in_memory;

pub use in_memory::InMemoryConversationStore;
