//! ドメイン層のエンティティ定義

use super::value_object::{ConnectionId, MessageText, Timestamp};

/// 接続エンティティ
///
/// Connection Registry が所有する。接続時に生成され、
/// 切断（または強制切断）時に破棄される。生存フラグは
/// Registry のメンバーシップそのもので表現される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// 接続 ID（トランスポート採番、プロセス内で一意）
    pub id: ConnectionId,
    /// 接続時刻
    pub connected_at: Timestamp,
}

impl Connection {
    /// 新しい接続エンティティを生成する
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self { id, connected_at }
    }
}

/// チャットメッセージエンティティ
///
/// Message Store に追記された時点で不変となる。
/// 送信者の接続 ID は受信時点で存在した接続を指す
/// （その後切断されていてもよい。履歴の取り消しは行わない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// 送信者の接続 ID
    pub sender: ConnectionId,
    /// メッセージ本文（検証済み・トリム済み）
    pub text: MessageText,
    /// ブローカーが受信時に採取したタイムスタンプ
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// 新しいチャットメッセージを生成する
    pub fn new(sender: ConnectionId, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            sender,
            text,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::ConnectionIdFactory;

    #[test]
    fn test_chat_message_holds_sender_and_text() {
        // テスト項目: ChatMessage が送信者・本文・タイムスタンプを保持する
        // given (前提条件):
        let sender = ConnectionIdFactory::generate();
        let text = MessageText::new("hello").unwrap();
        let timestamp = Timestamp::new(1000);

        // when (操作):
        let message = ChatMessage::new(sender.clone(), text.clone(), timestamp);

        // then (期待する結果):
        assert_eq!(message.sender, sender);
        assert_eq!(message.text, text);
        assert_eq!(message.timestamp, timestamp);
    }
}
