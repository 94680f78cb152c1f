//! UseCase: クライアント切断処理
//!
//! 切断時のプロトコル（既存クライアントの契約）：
//!
//! 1. Connection Registry から登録解除する（冪等：重複・遅延した
//!    切断通知は no-op）
//! 2. 更新後の接続数（`userCount`）を残りの全クライアントに
//!    ブロードキャストする
//! 3. メッセージの取り消しは行わない：切断したクライアントの送信済み
//!    メッセージは陳腐化した ID のまま履歴に残る（クライアント側の
//!    「自分のメッセージか」判定は ID の等値比較なので、再接続した
//!    ユーザーは別の送信者として表示される。これは仕様として維持する）

use std::sync::Arc;

use crate::domain::{BrokerRepository, ConnectionId, MessagePusher};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::sequencer::Sequencer;

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn BrokerRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態遷移＋ブロードキャストの直列化
    sequencer: Arc<Sequencer>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn BrokerRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<Sequencer>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
        }
    }

    /// クライアント切断を実行（冪等）
    ///
    /// # Arguments
    ///
    /// * `id` - 切断する接続の ID
    ///
    /// # Returns
    ///
    /// * `true` - 接続が存在し、解除とブロードキャストを行った
    /// * `false` - 既に解除済み（no-op、ブロードキャストもしない）
    pub async fn execute(&self, id: &ConnectionId) -> bool {
        let _guard = self.sequencer.acquire().await;

        // この接続の未配送分だけを破棄する。他の接続のキューには触れない。
        self.message_pusher.unregister_client(id).await;

        let (removed, user_count) = self.repository.unregister_connection(id).await;
        if !removed {
            return false;
        }

        let frame = serde_json::to_string(&ServerEvent::UserCount(user_count)).unwrap();
        let targets = self.repository.connected_ids().await;
        let failed = self.message_pusher.broadcast(targets, &frame).await;
        if !failed.is_empty() {
            tracing::warn!(
                "userCount broadcast failed for {} connection(s)",
                failed.len()
            );
        }

        true
    }
}
