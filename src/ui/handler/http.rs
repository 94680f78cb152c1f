//! HTTP API endpoint handlers.
//!
//! Read-only polling fallback for clients that cannot hold the upgraded
//! channel open; sending messages requires the WebSocket endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{http::RoomStateDto, websocket::MessageDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the current room state: user count plus the full message history
pub async fn get_room_state(State(state): State<Arc<AppState>>) -> Json<RoomStateDto> {
    let room_state = state.get_room_state_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(RoomStateDto {
        user_count: room_state.user_count,
        messages: room_state
            .messages
            .iter()
            .map(MessageDto::from)
            .collect(),
    })
}
