//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{
    message_views, ErrorResponse, PageInfo, SendMessageRequest, SessionResponse, TurnError,
    TurnResponse,
};
use super::sessions::SessionSlot;
use super::AppState;
use crate::dispatch::{handle_user_message, DispatchError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the page shell
        .route("/", get(serve_spa))
        .route("/assets/*path", get(serve_static))
        .route("/api/page", get(get_page))
        // Sessions
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/messages", post(send_message))
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Page
// ============================================================

async fn serve_spa() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

async fn get_page() -> Json<PageInfo> {
    Json(PageInfo::BRIDGE)
}

// ============================================================
// Sessions
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let (id, slot) = state.sessions.create().await;
    let session = slot.lock().await;
    Json(SessionResponse {
        id,
        messages: message_views(session.transcript()),
    })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let slot = lookup(&state, &id).await?;
    let session = slot.lock().await;
    Ok(Json(SessionResponse {
        id,
        messages: message_views(session.transcript()),
    }))
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let slot = lookup(&state, &id).await?;
    // Held for the whole turn: a second submission waits for this one
    let mut session = slot.lock().await;

    let outcome =
        handle_user_message(&mut session, state.client.as_ref(), &state.agent_id, &req.text)
            .await;

    let error = match outcome {
        Ok(turn) => {
            tracing::debug!(
                session_id = %id,
                started = turn.started,
                reply_chars = turn.reply.chars().count(),
                "Turn completed"
            );
            None
        }
        Err(DispatchError::EmptyMessage) => {
            return Err(AppError::BadRequest(DispatchError::EmptyMessage.to_string()));
        }
        Err(e) => Some(TurnError {
            message: e.to_string(),
            hint: e.hint(),
        }),
    };

    Ok(Json(TurnResponse {
        messages: message_views(session.transcript()),
        error,
    }))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let slot = lookup(&state, &id).await?;
    let mut session = slot.lock().await;
    session.reset();
    tracing::info!(session_id = %id, "Session reset");

    Ok(Json(SessionResponse {
        id,
        messages: message_views(session.transcript()),
    }))
}

async fn lookup(state: &AppState, id: &Uuid) -> Result<SessionSlot, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {id}")))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("build-bridge ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
