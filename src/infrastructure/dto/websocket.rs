//! WebSocket イベントフレームの DTO 定義
//!
//! ワイヤ契約は既存クライアントによって固定されている：
//!
//! - server→client `chatMessages` … `{id, text, timestamp}` の順序付き配列
//!   （接続直後と、メッセージ受理のたびに **全** スナップショット）
//! - server→client `userCount` … 整数（接続・切断のたび）
//! - client→server `chatMessage` … トリム済みテキスト（500 文字以内）
//!
//! フレームは `{"event": "...", "payload": ...}` 形式のタグ付き JSON。

use serde::{Deserialize, Serialize};

/// サーバ → クライアントのイベントフレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ServerEvent {
    /// 全メッセージ履歴（受理順）
    ChatMessages(Vec<MessageDto>),
    /// 現在の接続数
    UserCount(usize),
}

/// クライアント → サーバのイベントフレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ClientEvent {
    /// チャットメッセージの送信（本文のみ）
    ChatMessage(String),
}

/// ワイヤ上のメッセージ表現
///
/// フィールド名（`id` / `text` / `timestamp`）はクライアントの
/// レンダリングコードが参照しているため変更できない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    /// 送信者の接続 ID
    pub id: String,
    /// メッセージ本文
    pub text: String,
    /// Unix epoch ミリ秒
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_messages_frame_serializes_with_event_tag() {
        // テスト項目: chatMessages フレームが event/payload 形式で直列化される
        // given (前提条件):
        let event = ServerEvent::ChatMessages(vec![MessageDto {
            id: "abc".to_string(),
            text: "hello".to_string(),
            timestamp: 1000,
        }]);

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            r#"{"event":"chatMessages","payload":[{"id":"abc","text":"hello","timestamp":1000}]}"#
        );
    }

    #[test]
    fn test_user_count_frame_serializes_with_event_tag() {
        // テスト項目: userCount フレームが event/payload 形式で直列化される
        // given (前提条件):
        let event = ServerEvent::UserCount(3);

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"event":"userCount","payload":3}"#);
    }

    #[test]
    fn test_chat_message_frame_deserializes() {
        // テスト項目: クライアントからの chatMessage フレームを復元できる
        // given (前提条件):
        let json = r#"{"event":"chatMessage","payload":"hello"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(event, ClientEvent::ChatMessage("hello".to_string()));
    }

    #[test]
    fn test_unknown_event_fails_to_deserialize() {
        // テスト項目: 未知のイベント名はデシリアライズに失敗する
        // given (前提条件):
        let json = r#"{"event":"unknown","payload":"x"}"#;

        // when (操作):
        let result: Result<ClientEvent, _> = serde_json::from_str(json);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
