//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの有界送信キュー（`mpsc::Sender`）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//! - 遅延クライアントの隔離（キュー満杯 → sender を破棄して強制切断）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、メッセージ送信に使用します。
//! 送信は `try_send` のみで行い、決してブロックしない：
//! キューが満杯のクライアントはその場で登録解除され、対応する受信側
//! チャンネルが閉じることで当該接続のソケットタスクが通常の切断経路に入る。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel（有界）
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 非ブロッキング送信
    ///
    /// 失敗の種別を呼び出し側が区別できるよう、`TrySendError` を
    /// `MessagePushError` に変換する。
    fn try_push(
        sender: &PusherChannel,
        id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        sender.try_send(content.to_string()).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull(id.as_str().to_string()),
            TrySendError::Closed(_) => MessagePushError::ChannelClosed(id.as_str().to_string()),
        })
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", id.as_str());
        clients.insert(id, sender);
    }

    async fn unregister_client(&self, id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", id.as_str());
    }

    async fn push_to(&self, id: &ConnectionId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(id) else {
            return Err(MessagePushError::ClientNotFound(id.as_str().to_string()));
        };
        Self::try_push(sender, id, content)
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> Vec<ConnectionId> {
        let mut clients = self.clients.lock().await;
        let mut failed = Vec::new();

        for target in targets {
            let Some(sender) = clients.get(&target) else {
                // ブロードキャスト中に切断されたクライアントはスキップ
                tracing::warn!(
                    "Client '{}' not found during broadcast, skipping",
                    target.as_str()
                );
                continue;
            };

            match Self::try_push(sender, &target, content) {
                Ok(()) => {
                    tracing::trace!("Broadcasted message to client '{}'", target.as_str());
                }
                Err(e) => {
                    // 配送失敗はこの接続に隔離する。sender を破棄することで
                    // 受信側チャンネルが閉じ、当該接続だけが切断経路に入る。
                    tracing::warn!(
                        "Failed to push message to client '{}': {} - forcing disconnect",
                        target.as_str(),
                        e
                    );
                    clients.remove(&target);
                    failed.push(target);
                }
            }
        }

        failed
    }
}
