//! HTTP gateway for the Deskline help-desk assistant.
//!
//! Exposes the help-desk chat endpoints (single-shot and streaming),
//! conversation history, and a health check. Built on Axum with CORS for
//! the browser frontend, a request body limit, and HTTP trace logging.

pub mod api_v1;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use deskline_assistant::{Assistant, prompt};
use deskline_config::AppConfig;
use deskline_core::provider::Provider;
use deskline_core::store::ConversationStore;
use deskline_core::ticket::TicketStore;
use deskline_memory::InMemoryConversationStore;
use deskline_providers::OpenAiCompatProvider;
use deskline_tickets::{InMemoryTicketStore, SqliteTicketStore};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub assistant: Arc<Assistant>,
    pub store: Arc<dyn ConversationStore>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes and layers.
pub fn build_router(state: SharedState, cors_origin: &str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(cors_layer(cors_origin))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS for the browser frontend: one exact origin from config.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("conversationid"),
            HeaderName::from_static("timezone"),
        ])
        .max_age(std::time::Duration::from_secs(3600));

    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(_) => {
            warn!(origin = %origin, "Invalid CORS origin in config, cross-origin requests will be rejected");
            layer
        }
    }
}

/// Start the gateway HTTP server.
///
/// Builds the ticket store, tool registry, provider, conversation memory,
/// and assistant once and shares them across all requests.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ticket_store: Arc<dyn TicketStore> = match config.tickets.backend.as_str() {
        "memory" => Arc::new(InMemoryTicketStore::new()),
        _ => Arc::new(SqliteTicketStore::new(&config.tickets.sqlite_path).await?),
    };

    let tools = Arc::new(deskline_tools::default_registry(ticket_store));

    let provider: Arc<dyn Provider> = Arc::new(OpenAiCompatProvider::new(
        "openai",
        &config.provider.api_url,
        config.provider.api_key.clone().unwrap_or_default(),
    ));

    let store: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::new());

    let system_prompt = match &config.assistant.system_prompt_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => prompt::DEFAULT_SYSTEM_PROMPT.to_string(),
    };

    let assistant = Arc::new(
        Assistant::new(
            provider,
            store.clone(),
            tools,
            &config.provider.model,
            config.provider.temperature,
        )
        .with_max_tokens(config.provider.max_tokens)
        .with_max_tool_round_trips(config.assistant.max_tool_round_trips)
        .with_system_prompt(system_prompt),
    );

    let state = Arc::new(GatewayState { assistant, store });
    let app = build_router(state, &config.gateway.cors_origin);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    info!(addr = %addr, model = %config.provider.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
