//! Conversation and message domain types.
//!
//! Two layers deliberately kept apart:
//!
//! - [`Turn`] is the durable record stored in conversation memory: who
//!   spoke, what they said, and which tool calls produced the answer.
//! - [`ChatMessage`] is the wire shape sent to the model provider,
//!   including the transient tool-call/tool-result plumbing of a single
//!   invocation.
//!
//! Replayed history is rebuilt from `Turn`s as plain user/assistant
//! content; wire-level tool-call ids are never persisted, because an
//! assistant message carrying `tool_calls` without its matching tool
//! results is rejected by OpenAI-compatible APIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-supplied opaque token grouping related turns into one dialogue
/// session. There is no server-side creation step; reuse across unrelated
/// sessions is the client's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (the fixed help-desk prompt)
    System,
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// Tool execution result
    Tool,
}

/// A single wire-level message in a model invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// A tool result message answering one tool call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool call embedded in an assistant message, as the provider sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call (provider-assigned)
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON string
    pub arguments: String,
}

/// Record of one dispatched tool call, kept on the assistant turn that it
/// helped produce. Purely informational once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Tool name
    pub name: String,

    /// The arguments the model supplied
    pub arguments: serde_json::Value,

    /// The output (or error text) fed back to the model
    pub output: String,

    /// Whether the tool executed successfully
    pub success: bool,
}

/// One durable exchange unit in a conversation. Immutable once recorded;
/// the core never deletes turns (retention is an external concern).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who spoke: `User` or `Assistant`
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool calls dispatched while producing this turn (assistant only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRecord>,

    /// When the turn was recorded
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCallRecord>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
            created_at: Utc::now(),
        }
    }
}
