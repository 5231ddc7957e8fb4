//! HTTP surface for hookrelay.
//!
//! Routes:
//! - `GET /`            landing page with the setup form
//! - `POST /createHook` register a relay hook
//! - `POST /callback`   queue-platform callback; relays the stored message
//! - `GET /health`      liveness plus whether a session exists
//!
//! Every 500 leaving the router carries the same opaque body.
//!
//! Built on Axum.

pub mod error;
pub mod frontend;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{Query, Request, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, info};

use hookrelay_config::AppConfig;
use hookrelay_core::session::{SessionId, SessionStore};
use hookrelay_relay::{Relay, SetupRequest};

pub use error::{ApiError, SERVER_ERROR_BODY};

/// Body returned by both relay endpoints on success.
pub const ACK: &str = "OK";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub relay: Relay,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/createHook", post(create_hook_handler))
        .route("/callback", post(callback_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(mask_server_errors))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Wire the real platform clients into a relay.
///
/// Fails if the HTTP client cannot be built (e.g. no TLS backend).
pub fn build_state(config: &AppConfig) -> Result<SharedState, Box<dyn std::error::Error>> {
    let (mmx, slack) = hookrelay_clients::from_config(config)
        .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
    let sessions = Arc::new(SessionStore::new(config.sessions.max_retained));
    let relay = Relay::new(
        Arc::new(mmx),
        Arc::new(slack),
        sessions,
        config.server.callback_url.clone(),
    );
    Ok(Arc::new(GatewayState { relay }))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.server.bind_addr();
    let app = build_router(build_state(&config)?);

    info!(
        addr = %addr,
        callback_url = %config.server.callback_url,
        "hookrelay listening"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Replace the body of any 500 with [`SERVER_ERROR_BODY`], including ones
/// produced by panics or by axum itself.
async fn mask_server_errors(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
        return (StatusCode::INTERNAL_SERVER_ERROR, Body::from(SERVER_ERROR_BODY)).into_response();
    }
    response
}

// --- Handlers ---

async fn create_hook_handler(
    State(state): State<SharedState>,
    payload: Result<Json<SetupRequest>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let Json(request) = payload?;
    debug!(request = ?request, "Setup request received");

    let outcome = state.relay.create_hook(request).await?;
    info!(
        session = %outcome.session_id,
        channel_id = %outcome.channel_id,
        hook_target = %outcome.hook.target_url,
        hook_status = outcome.hook_response.status,
        "Hook created"
    );
    Ok(ACK)
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    #[serde(default)]
    session: Option<SessionId>,
}

async fn callback_handler(
    State(state): State<SharedState>,
    Query(query): Query<CallbackQuery>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    // The queue platform's payload is not used; the session decides what to post.
    info!(session = ?query.session, body_len = body.len(), "Callback invoked");

    let response = state.relay.handle_callback(query.session.as_ref()).await?;
    debug!(status = response.status, body = %response.body, "Relay post answered");
    Ok(ACK)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    configured: bool,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        configured: state.relay.sessions().is_configured().await,
    })
}
