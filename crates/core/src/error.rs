//! Error types for the Deskline domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type; `Error` is the
//! request-level taxonomy surfaced at the HTTP boundary.

use thiserror::Error;

/// The request-level error type for assistant invocations.
///
/// Tool *execution* failures never appear here — they are absorbed into
/// the model's context as error content so the model can recover. Only
/// failures that make the whole request unservable propagate.
#[derive(Debug, Error)]
pub enum Error {
    /// The model provider was unreachable or returned a hard failure.
    #[error("Assistant unavailable: {0}")]
    AssistantUnavailable(#[source] ProviderError),

    /// The model requested a tool nobody registered. A configuration
    /// defect, not something the model can recover from.
    #[error("Unknown tool requested: {0}")]
    UnknownTool(String),

    /// Conversation memory could not be read or written. The request
    /// must fail rather than silently proceed with empty context.
    #[error("Conversation memory unavailable: {0}")]
    MemoryUnavailable(#[source] MemoryError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ProviderError> for Error {
    fn from(e: ProviderError) -> Self {
        Self::AssistantUnavailable(e)
    }
}

impl From<MemoryError> for Error {
    fn from(e: MemoryError) -> Self {
        Self::MemoryUnavailable(e)
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool registered under the requested name. Fatal to the
    /// request, unlike every other variant.
    #[error("Tool not found: {0}")]
    Unknown(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

#[derive(Debug, Error)]
pub enum TicketStoreError {
    #[error("Ticket store unavailable: {0}")]
    Unavailable(String),

    #[error("A ticket already exists for contact email {0}")]
    DuplicateEmail(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_status() {
        let err = Error::AssistantUnavailable(ProviderError::ApiError {
            status_code: 502,
            message: "upstream gone".into(),
        });
        assert!(err.to_string().contains("Assistant unavailable"));
    }

    #[test]
    fn unknown_tool_is_distinct_from_execution_failure() {
        let unknown = ToolError::Unknown("frobnicator".into());
        let failed = ToolError::ExecutionFailed {
            tool_name: "ticket".into(),
            reason: "store down".into(),
        };
        assert!(matches!(unknown, ToolError::Unknown(_)));
        assert!(failed.to_string().contains("store down"));
    }

    #[test]
    fn memory_error_converts_to_request_error() {
        let err: Error = MemoryError::Storage("disk gone".into()).into();
        assert!(matches!(err, Error::MemoryUnavailable(_)));
    }
}
