//! HTTP API レスポンスの DTO 定義
//!
//! アップグレードされたチャンネルを維持できないクライアント向けの
//! ポーリング用フォールバック。読み取り専用で、送信には WebSocket が必要。

use serde::{Deserialize, Serialize};

use super::websocket::MessageDto;

/// ルーム状態のレスポンス（`GET /api/room`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateDto {
    /// 現在の接続数
    pub user_count: usize,
    /// 全メッセージ履歴（受理順）
    pub messages: Vec<MessageDto>,
}
