//! Support ticket tool.
//!
//! Lets the model look up an existing ticket by contact email or open a
//! new one. Store failures come back as tool errors so the orchestration
//! loop can report them into the model's context instead of failing the
//! request.

use async_trait::async_trait;
use deskline_core::error::{TicketStoreError, ToolError};
use deskline_core::ticket::{TicketDraft, TicketPriority, TicketStore};
use deskline_core::tool::{Tool, ToolContext, ToolResult};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct TicketTool {
    store: Arc<dyn TicketStore>,
}

impl TicketTool {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TicketAction {
    Lookup,
    Create,
}

#[derive(Debug, Deserialize)]
struct TicketArgs {
    action: TicketAction,
    email: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    priority: Option<TicketPriority>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl Tool for TicketTool {
    fn name(&self) -> &str {
        "ticket"
    }

    fn description(&self) -> &str {
        "Look up or create a support ticket. Use action \"lookup\" with the user's contact email to check an existing ticket, or action \"create\" with summary, priority, category, and description to open a new one. Each contact email can have at most one ticket."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["lookup", "create"],
                    "description": "Whether to look up an existing ticket or create a new one"
                },
                "email": {
                    "type": "string",
                    "description": "The user's contact email"
                },
                "summary": {
                    "type": "string",
                    "description": "One-line summary of the issue (create only)"
                },
                "priority": {
                    "type": "string",
                    "enum": ["LOW", "MEDIUM", "HIGH", "URGENT"],
                    "description": "Triage priority (create only, default MEDIUM)"
                },
                "category": {
                    "type": "string",
                    "description": "Issue category, e.g. auth, billing, hardware (create only)"
                },
                "description": {
                    "type": "string",
                    "description": "Full problem description (create only)"
                }
            },
            "required": ["action", "email"]
        })
    }

    async fn execute(
        &self,
        _ctx: &ToolContext,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let args: TicketArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        if args.email.trim().is_empty() {
            return Err(ToolError::InvalidArguments("email must not be empty".into()));
        }

        match args.action {
            TicketAction::Lookup => {
                debug!(email = %args.email, "Ticket lookup");
                let found = self
                    .store
                    .find_by_email(&args.email)
                    .await
                    .map_err(|e| store_error(self.name(), e))?;

                let output = match found {
                    Some(ticket) => serde_json::to_string_pretty(&ticket)
                        .map_err(|e| ToolError::ExecutionFailed {
                            tool_name: self.name().into(),
                            reason: e.to_string(),
                        })?,
                    None => format!("No ticket found for {}", args.email),
                };

                Ok(ToolResult {
                    call_id: String::new(),
                    success: true,
                    output,
                })
            }
            TicketAction::Create => {
                let summary = args.summary.filter(|s| !s.trim().is_empty()).ok_or_else(
                    || ToolError::InvalidArguments("summary is required to create a ticket".into()),
                )?;
                let description = args
                    .description
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        ToolError::InvalidArguments(
                            "description is required to create a ticket".into(),
                        )
                    })?;

                let draft = TicketDraft {
                    summary,
                    priority: args.priority.unwrap_or(TicketPriority::Medium),
                    category: args.category.unwrap_or_else(|| "general".into()),
                    description,
                    email: args.email,
                };

                debug!(email = %draft.email, "Ticket create");
                let ticket = self
                    .store
                    .create(draft)
                    .await
                    .map_err(|e| store_error(self.name(), e))?;

                let output = serde_json::to_string_pretty(&ticket).map_err(|e| {
                    ToolError::ExecutionFailed {
                        tool_name: self.name().into(),
                        reason: e.to_string(),
                    }
                })?;

                Ok(ToolResult {
                    call_id: String::new(),
                    success: true,
                    output,
                })
            }
        }
    }
}

fn store_error(tool_name: &str, e: TicketStoreError) -> ToolError {
    warn!(error = %e, "Ticket store operation failed");
    ToolError::ExecutionFailed {
        tool_name: tool_name.into(),
        reason: e.to_string(),
    }
}
