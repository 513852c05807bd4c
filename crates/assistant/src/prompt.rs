//! Prompt assembly.
//!
//! Builds the wire message list for one model invocation: the system
//! prompt first, then the conversation history oldest-first, then the new
//! user query. History turns are replayed as plain content; tool-call
//! records stay behind in memory, because a replayed assistant message
//! carrying tool calls without matching results would be rejected by the
//! provider.
//!
//! No truncation: the full history is replayed on every call. Long
//! conversations therefore grow the prompt without bound.

use deskline_core::message::{ChatMessage, Role, Turn};

/// The built-in system prompt used when no prompt file is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful IT help-desk assistant. You answer employees' questions \
about their support issues, look up their existing tickets, and open new \
tickets on their behalf.

Guidelines:
- A user is identified by their contact email. Ask for it if you need it \
and don't have it yet.
- Before creating a ticket, check whether the user already has one; each \
email can have at most one open ticket.
- When creating a ticket, gather a short summary, a priority, a category, \
and a full description. Confirm the details back to the user.
- If a tool reports an error, tell the user plainly what went wrong and \
what they can do instead. Never invent ticket data.
- Keep answers short and concrete.";

/// Assemble the message list for one invocation.
pub fn build(system_prompt: &str, history: &[Turn], query: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));

    for turn in history {
        match turn.role {
            Role::User => messages.push(ChatMessage::user(&turn.content)),
            Role::Assistant => messages.push(ChatMessage::assistant(&turn.content)),
            // Memory only ever stores user and assistant turns.
            Role::System | Role::Tool => {}
        }
    }

    messages.push(ChatMessage::user(query));
    messages
}
