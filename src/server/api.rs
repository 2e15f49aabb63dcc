//! HTTP routes for the chat widget.
//!
//! - `POST /api/chat`: `{ "messages": [{ "role", "content" }] }` → `{ "response" }`

use crate::agent::WaiterAgent;
use crate::models::chat::{ parse_messages, ChatResponse, ErrorResponse };
use std::any::Any;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::post,
    Router,
    Json,
    extract::State,
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde_json::Value;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{ Any as AnyOrigin, CorsLayer };
use uuid::Uuid;
use log::{ info, warn, error };

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Messages array required")]
    MissingMessages,
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingMessages => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    agent: Arc<WaiterAgent>,
}

impl AppState {
    pub fn new(agent: Arc<WaiterAgent>) -> Self {
        Self { agent }
    }
}

pub fn app_router(state: AppState) -> Router {
    let routes = Router::new().route("/api/chat", post(chat_handler)).with_state(state);
    with_middleware(routes)
}

fn with_middleware(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    router.layer(CatchPanicLayer::custom(handle_panic)).layer(cors)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    error!("Chat error: {}", detail);
    ApiError::Internal.into_response()
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes
) -> Result<Json<ChatResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("[{}] Rejected chat request with invalid JSON: {}", request_id, e);
        ApiError::MissingMessages
    })?;
    let messages = parse_messages(&value).ok_or_else(|| {
        warn!("[{}] Rejected chat request without a messages array", request_id);
        ApiError::MissingMessages
    })?;

    info!("[{}] Chat request with {} message(s)", request_id, messages.len());
    let response = state.agent.reply(&request_id, &messages).await;
    Ok(Json(ChatResponse { response }))
}
