//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::entity::ChatMessage;
use super::error::RepositoryError;
use super::value_object::{ConnectionId, MessageText, Timestamp};

/// Broker Repository trait
///
/// Connection Registry と Message Store への唯一のアクセス経路。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## 一貫性
///
/// 複合操作（登録とスナップショット取得、追記とスナップショット取得）は
/// 1 つのクリティカルセクションで実行されることを実装側が保証する。
/// スナップショットに書きかけのメッセージや順序の乱れが見えてはならない。
#[async_trait]
pub trait BrokerRepository: Send + Sync {
    /// 新しい接続を登録する
    ///
    /// ID の採番・登録・履歴スナップショット取得・接続数の再計算を
    /// アトミックに行う。
    ///
    /// # Returns
    ///
    /// `(採番された接続 ID, 登録時点の全履歴, 登録後の接続数)`
    async fn register_connection(
        &self,
        timestamp: Timestamp,
    ) -> (ConnectionId, Vec<ChatMessage>, usize);

    /// 接続を登録解除する（冪等）
    ///
    /// # Returns
    ///
    /// `(接続が存在して削除されたか, 解除後の接続数)`
    async fn unregister_connection(&self, id: &ConnectionId) -> (bool, usize);

    /// メッセージを履歴に追記し、追記後の全履歴を返す
    ///
    /// 送信者が登録されていない場合（切断とのレース）は
    /// `RepositoryError::UnknownConnection` を返し、状態は変化しない。
    async fn append_message(
        &self,
        sender: ConnectionId,
        text: MessageText,
        timestamp: Timestamp,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// 接続が登録されているかを返す
    async fn is_connected(&self, id: &ConnectionId) -> bool;

    /// 現在の接続数を返す
    async fn connection_count(&self) -> usize;

    /// 現在の全履歴を受理順で返す
    async fn snapshot(&self) -> Vec<ChatMessage>;

    /// 接続中の全ての接続 ID を返す
    async fn connected_ids(&self) -> Vec<ConnectionId>;
}
