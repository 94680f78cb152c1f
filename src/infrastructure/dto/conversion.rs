//! Conversion logic between DTOs and domain entities.

use crate::domain::entity::ChatMessage;
use crate::infrastructure::dto::websocket::{MessageDto, ServerEvent};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.sender.as_str().to_string(),
            text: message.text.as_str().to_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

impl From<ChatMessage> for MessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.sender.into_string(),
            text: message.text.into_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

/// 履歴スナップショットを `chatMessages` フレームに変換する
pub fn snapshot_to_event(snapshot: Vec<ChatMessage>) -> ServerEvent {
    ServerEvent::ChatMessages(snapshot.into_iter().map(MessageDto::from).collect())
}
