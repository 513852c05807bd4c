//! The invocation orchestrator.
//!
//! One loop serves both call shapes: assemble the prompt from memory,
//! invoke the model with the mode's tool subset, dispatch any requested
//! tool calls through the registry, feed the results back, and repeat
//! until the model answers in text (or the round-trip bound is hit).
//! On completion the user turn and the assistant turn are appended to
//! conversation memory, in that order.
//!
//! Error policy: tool *execution* failures are absorbed into the model's
//! context as error content so it can recover in the same request. A tool
//! *name* nobody registered is a configuration defect and fails the
//! request; so do provider and memory failures.

pub mod prompt;
pub mod stream;

use deskline_core::error::{Error, MemoryError, Result, ToolError};
use deskline_core::message::{
    ChatMessage, ConversationId, MessageToolCall, ToolCallRecord, Turn,
};
use deskline_core::provider::{Provider, ProviderRequest, ToolDefinition};
use deskline_core::store::ConversationStore;
use deskline_core::tool::{ToolCall, ToolContext, ToolRegistry};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub use stream::AssistantEvent;

/// The two call shapes, each with its own fixed tool subset.
///
/// The asymmetry is deliberate policy carried over from the reference
/// deployment: single-shot calls may consult the clock and the ticket
/// store; streaming calls only get the ticket store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Sync,
    Streaming,
}

impl CallMode {
    /// The tool names exposed to the model in this mode.
    pub fn tool_names(&self) -> &'static [&'static str] {
        match self {
            CallMode::Sync => &["current_datetime", "ticket"],
            CallMode::Streaming => &["ticket"],
        }
    }
}

/// Answer returned when the model keeps requesting tools past the bound.
const ROUND_TRIP_LIMIT_ANSWER: &str =
    "I wasn't able to finish looking that up. Could you rephrase or narrow down your question?";

/// The help-desk assistant: provider + memory + tools wired into one
/// orchestration loop. Cheap to clone-share via `Arc`; all state is
/// per-request.
pub struct Assistant {
    provider: Arc<dyn Provider>,
    store: Arc<dyn ConversationStore>,
    tools: Arc<ToolRegistry>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    max_tool_round_trips: u32,
    system_prompt: String,
}

impl Assistant {
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Arc<dyn ConversationStore>,
        tools: Arc<ToolRegistry>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            store,
            tools,
            model: model.into(),
            temperature,
            max_tokens: None,
            max_tool_round_trips: 8,
            system_prompt: prompt::DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the upper bound on tool round-trips per request.
    pub fn with_max_tool_round_trips(mut self, max: u32) -> Self {
        self.max_tool_round_trips = max;
        self
    }

    /// Replace the built-in system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    fn request(&self, messages: Vec<ChatMessage>, tools: Vec<ToolDefinition>, stream: bool) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools,
            stream,
        }
    }

    /// Single-shot invocation: returns the complete answer text.
    pub async fn answer(
        &self,
        id: &ConversationId,
        query: &str,
        ctx: &ToolContext,
    ) -> Result<String> {
        let history = self.store.load(id).await?;
        info!(
            conversation_id = %id,
            history_turns = history.len(),
            "Answering help-desk query"
        );

        let mut messages = prompt::build(&self.system_prompt, &history, query);
        let tool_defs = self.tools.definitions_for(CallMode::Sync.tool_names());
        let mut records: Vec<ToolCallRecord> = Vec::new();

        let mut round_trips = 0u32;
        let answer = loop {
            let response = self
                .provider
                .complete(self.request(messages.clone(), tool_defs.clone(), false))
                .await?;

            if response.message.tool_calls.is_empty() {
                break response.message.content;
            }

            round_trips += 1;
            if round_trips > self.max_tool_round_trips {
                warn!(
                    conversation_id = %id,
                    round_trips,
                    "Tool round-trip bound reached, forcing text answer"
                );
                break ROUND_TRIP_LIMIT_ANSWER.to_string();
            }

            let tool_calls = response.message.tool_calls.clone();
            messages.push(response.message);
            self.dispatch_tool_calls(&tool_calls, ctx, &mut messages, &mut records)
                .await?;
        };

        self.record_exchange(id, query, &answer, records).await?;
        Ok(answer)
    }

    /// Streaming invocation: returns a receiver of [`AssistantEvent`]s.
    ///
    /// The memory load happens before the stream starts, so a memory
    /// outage fails the request up front. Everything after that runs in a
    /// spawned task; a failure mid-stream terminates the sequence with an
    /// `Error` event, and a dropped receiver ends the task.
    pub async fn answer_stream(
        &self,
        id: &ConversationId,
        query: &str,
        ctx: &ToolContext,
    ) -> Result<mpsc::Receiver<AssistantEvent>> {
        let history = self.store.load(id).await?;
        info!(
            conversation_id = %id,
            history_turns = history.len(),
            "Streaming help-desk query"
        );

        let (tx, rx) = mpsc::channel::<AssistantEvent>(128);

        let provider = self.provider.clone();
        let store = self.store.clone();
        let tools = self.tools.clone();
        let model = self.model.clone();
        let temperature = self.temperature;
        let max_tokens = self.max_tokens;
        let max_round_trips = self.max_tool_round_trips;
        let system_prompt = self.system_prompt.clone();
        let id = id.clone();
        let query = query.to_string();
        let ctx = ctx.clone();

        tokio::spawn(async move {
            let mut messages = prompt::build(&system_prompt, &history, &query);
            let tool_defs = tools.definitions_for(CallMode::Streaming.tool_names());
            let mut records: Vec<ToolCallRecord> = Vec::new();
            let mut answer = String::new();
            let mut round_trips = 0u32;

            loop {
                let request = ProviderRequest {
                    model: model.clone(),
                    messages: messages.clone(),
                    temperature,
                    max_tokens,
                    tools: tool_defs.clone(),
                    stream: true,
                };

                let mut chunks = match provider.stream(request).await {
                    Ok(rx) => rx,
                    Err(e) => {
                        warn!(conversation_id = %id, error = %e, "Provider stream failed");
                        let _ = tx
                            .send(AssistantEvent::Error {
                                message: Error::AssistantUnavailable(e).to_string(),
                            })
                            .await;
                        return;
                    }
                };

                let mut content = String::new();
                let mut tool_calls: Vec<MessageToolCall> = Vec::new();

                while let Some(chunk) = chunks.recv().await {
                    let chunk = match chunk {
                        Ok(c) => c,
                        Err(e) => {
                            let _ = tx
                                .send(AssistantEvent::Error {
                                    message: Error::AssistantUnavailable(e).to_string(),
                                })
                                .await;
                            return;
                        }
                    };

                    if let Some(text) = &chunk.content
                        && !text.is_empty()
                    {
                        content.push_str(text);
                        if tx
                            .send(AssistantEvent::Chunk {
                                content: text.clone(),
                            })
                            .await
                            .is_err()
                        {
                            // Client went away; stop producing.
                            debug!(conversation_id = %id, "Stream receiver dropped");
                            return;
                        }
                    }

                    tool_calls.extend(chunk.tool_calls);
                }

                if tool_calls.is_empty() {
                    answer.push_str(&content);
                    break;
                }

                round_trips += 1;
                if round_trips > max_round_trips {
                    warn!(
                        conversation_id = %id,
                        round_trips,
                        "Tool round-trip bound reached, forcing text answer"
                    );
                    if tx
                        .send(AssistantEvent::Chunk {
                            content: ROUND_TRIP_LIMIT_ANSWER.to_string(),
                        })
                        .await
                        .is_err()
                    {
                        return;
                    }
                    answer.push_str(ROUND_TRIP_LIMIT_ANSWER);
                    break;
                }

                let mut assistant_msg = ChatMessage::assistant(content);
                assistant_msg.tool_calls = tool_calls.clone();
                messages.push(assistant_msg);

                if let Err(e) =
                    dispatch_tool_calls(&tools, &tool_calls, &ctx, &mut messages, &mut records)
                        .await
                {
                    let _ = tx.send(AssistantEvent::Error { message: e.to_string() }).await;
                    return;
                }
            }

            if let Err(e) = record_exchange(store.as_ref(), &id, &query, &answer, records).await {
                warn!(conversation_id = %id, error = %e, "Failed to record exchange");
                let _ = tx
                    .send(AssistantEvent::Error {
                        message: Error::MemoryUnavailable(e).to_string(),
                    })
                    .await;
                return;
            }

            let _ = tx.send(AssistantEvent::Done { round_trips }).await;
        });

        Ok(rx)
    }

    async fn dispatch_tool_calls(
        &self,
        tool_calls: &[MessageToolCall],
        ctx: &ToolContext,
        messages: &mut Vec<ChatMessage>,
        records: &mut Vec<ToolCallRecord>,
    ) -> Result<()> {
        dispatch_tool_calls(&self.tools, tool_calls, ctx, messages, records).await
    }

    async fn record_exchange(
        &self,
        id: &ConversationId,
        query: &str,
        answer: &str,
        records: Vec<ToolCallRecord>,
    ) -> Result<()> {
        record_exchange(self.store.as_ref(), id, query, answer, records)
            .await
            .map_err(Error::MemoryUnavailable)
    }
}

/// Execute each requested tool and push its result message. An unknown
/// tool name fails the request; any other failure is reported to the
/// model as error content and the loop continues.
async fn dispatch_tool_calls(
    tools: &ToolRegistry,
    tool_calls: &[MessageToolCall],
    ctx: &ToolContext,
    messages: &mut Vec<ChatMessage>,
    records: &mut Vec<ToolCallRecord>,
) -> Result<()> {
    for tc in tool_calls {
        let arguments: serde_json::Value =
            serde_json::from_str(&tc.arguments).unwrap_or_default();
        let call = ToolCall {
            id: tc.id.clone(),
            name: tc.name.clone(),
            arguments: arguments.clone(),
        };

        debug!(tool = %tc.name, "Dispatching tool call");
        match tools.execute(ctx, &call).await {
            Ok(result) => {
                records.push(ToolCallRecord {
                    name: tc.name.clone(),
                    arguments,
                    output: result.output.clone(),
                    success: result.success,
                });
                messages.push(ChatMessage::tool_result(&tc.id, &result.output));
            }
            Err(ToolError::Unknown(name)) => {
                warn!(tool = %name, "Model requested an unregistered tool");
                return Err(Error::UnknownTool(name));
            }
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Tool execution failed");
                let error_text = format!("Error: {e}");
                records.push(ToolCallRecord {
                    name: tc.name.clone(),
                    arguments,
                    output: error_text.clone(),
                    success: false,
                });
                messages.push(ChatMessage::tool_result(&tc.id, &error_text));
            }
        }
    }
    Ok(())
}

/// Append the user turn then the assistant turn. Ordering within the
/// conversation follows request completion, not request issue.
async fn record_exchange(
    store: &dyn ConversationStore,
    id: &ConversationId,
    query: &str,
    answer: &str,
    records: Vec<ToolCallRecord>,
) -> std::result::Result<(), MemoryError> {
    store.append(id, Turn::user(query)).await?;
    store.append(id, Turn::assistant(answer, records)).await?;
    Ok(())
}
