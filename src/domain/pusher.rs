//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信を抽象化する。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// クライアントへの送信チャンネル
///
/// 接続ごとの **有界** 送信キュー。遅いクライアントが他のクライアントへの
/// 配送を遅延させないため、無界チャンネルは使わない。
pub type PusherChannel = mpsc::Sender<String>;

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のクライアントが登録されていない
    #[error("client not found: {0}")]
    ClientNotFound(String),

    /// 送信キューが満杯（遅いクライアント）
    ///
    /// ブロードキャストをブロックせず、該当クライアントを強制切断する。
    #[error("send queue full for client: {0}")]
    QueueFull(String),

    /// 送信チャンネルが既に閉じている
    #[error("send channel closed for client: {0}")]
    ChannelClosed(String),
}

/// MessagePusher trait
///
/// ## 配送の分離
///
/// ブロードキャストはイベント単位で全対象に行うが、ある接続への配送失敗が
/// 他の接続への配送を妨げてはならない。失敗した接続はその接続の
/// 切断処理だけを引き起こす。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録する
    async fn register_client(&self, id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除する
    async fn unregister_client(&self, id: &ConnectionId);

    /// 特定のクライアントにメッセージを送信する（非ブロッキング）
    async fn push_to(&self, id: &ConnectionId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントにメッセージをブロードキャストする
    ///
    /// 個別の配送失敗は隔離して続行する。
    ///
    /// # Returns
    ///
    /// 配送に失敗した（強制切断されるべき）接続 ID のリスト
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> Vec<ConnectionId>;
}
