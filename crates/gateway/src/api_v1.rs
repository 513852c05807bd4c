//! HTTP API v1 — the help-desk endpoints.
//!
//! - `POST /api/v1/helpdesk`              — complete answer text
//! - `POST /api/v1/helpdesk/stream`       — incremental text fragments
//! - `GET  /api/v1/helpdesk/history/{id}` — recorded turns as JSON
//!
//! Both POST endpoints take the raw query as the request body and the
//! conversation id in the `ConversationId` header (missing → 400). The
//! optional `Timezone` header carries an IANA zone name for the
//! date/time tool; absent means UTC.

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono_tz::Tz;
use deskline_assistant::AssistantEvent;
use deskline_core::error::Error;
use deskline_core::message::{ConversationId, Turn};
use deskline_core::tool::ToolContext;
use serde::Serialize;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::SharedState;

/// Build the v1 API router. Nest this under "/api/v1".
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/helpdesk", post(helpdesk_handler))
        .route("/helpdesk/stream", post(helpdesk_stream_handler))
        .route("/helpdesk/history/{id}", get(history_handler))
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Provider outages are the upstream's fault (502); everything else that
/// reaches this boundary is ours (500).
fn map_error(e: Error) -> ApiError {
    let status = match &e {
        Error::AssistantUnavailable(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

/// Pull the conversation id and timezone context out of the headers.
fn request_context(headers: &HeaderMap) -> Result<(ConversationId, ToolContext), ApiError> {
    let id = headers
        .get("ConversationId")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| bad_request("Missing ConversationId header"))?;

    let timezone = match headers.get("Timezone").and_then(|v| v.to_str().ok()) {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| bad_request(format!("Unknown timezone: {name}")))?,
        None => Tz::UTC,
    };

    Ok((ConversationId::from(id), ToolContext { timezone }))
}

async fn helpdesk_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: String,
) -> Result<String, ApiError> {
    let (id, ctx) = request_context(&headers)?;
    info!(conversation_id = %id, query_len = body.len(), "helpdesk request");

    state
        .assistant
        .answer(&id, &body, &ctx)
        .await
        .map_err(map_error)
}

async fn helpdesk_stream_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, ApiError> {
    let (id, ctx) = request_context(&headers)?;
    info!(conversation_id = %id, query_len = body.len(), "helpdesk stream request");

    let rx = state
        .assistant
        .answer_stream(&id, &body, &ctx)
        .await
        .map_err(map_error)?;

    // Chunks become body fragments; an error event aborts the chunked
    // transfer so the client sees a broken body, not a truncated answer
    // that looks complete.
    let stream = ReceiverStream::new(rx).filter_map(|event| match event {
        AssistantEvent::Chunk { content } => Some(Ok(Bytes::from(content))),
        AssistantEvent::Done { .. } => None,
        AssistantEvent::Error { message } => {
            warn!(error = %message, "Stream terminated with error");
            Some(Err(std::io::Error::other(message)))
        }
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(stream))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })
}

async fn history_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Turn>>, ApiError> {
    let turns = state
        .store
        .load(&ConversationId::from(id))
        .await
        .map_err(|e| map_error(Error::MemoryUnavailable(e)))?;
    Ok(Json(turns))
}
