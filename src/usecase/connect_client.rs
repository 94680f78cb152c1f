//! UseCase: クライアント接続処理
//!
//! 接続時のプロトコル（既存クライアントの契約）：
//!
//! 1. Connection Registry に登録し、接続 ID を採番する
//! 2. その時点の全履歴（`chatMessages`）を **新規クライアントだけ** に届ける
//! 3. 更新後の接続数（`userCount`）を新規クライアントを含む **全員** に
//!    ブロードキャストする
//!
//! 登録と userCount のブロードキャストはシーケンサの 1 区間で行う。
//! 履歴の実際の送信は UI 層がソケットへ直接行う（pusher ループが
//! キューを消費し始める前に送られるため、chatMessages → userCount の
//! 順序が保たれる）。

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    BrokerRepository, ChatMessage, ConnectionId, MessagePusher, PusherChannel, Timestamp,
};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::sequencer::Sequencer;

/// 接続処理の結果
#[derive(Debug)]
pub struct ConnectedClient {
    /// 採番された接続 ID
    pub id: ConnectionId,
    /// 登録時点の全履歴（新規クライアントへのスナップショット配送用）
    pub snapshot: Vec<ChatMessage>,
    /// 登録後の接続数
    pub user_count: usize,
}

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn BrokerRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 時刻の抽象化
    clock: Arc<dyn Clock>,
    /// 状態遷移＋ブロードキャストの直列化
    sequencer: Arc<Sequencer>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn BrokerRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        sequencer: Arc<Sequencer>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            sequencer,
        }
    }

    /// クライアント接続を実行
    ///
    /// 失敗しない：ID は採番制で重複せず、容量制限もない。
    ///
    /// # Arguments
    ///
    /// * `sender` - このクライアントへの有界送信キュー
    ///
    /// # Returns
    ///
    /// 採番された接続 ID・履歴スナップショット・接続数
    pub async fn execute(&self, sender: PusherChannel) -> ConnectedClient {
        let _guard = self.sequencer.acquire().await;

        // 1. 登録・スナップショット・接続数を 1 つのクリティカルセクションで取得
        let timestamp = Timestamp::new(self.clock.now_millis());
        let (id, snapshot, user_count) = self.repository.register_connection(timestamp).await;

        // 2. 送信キューを登録（userCount は新規クライアントにも届く）
        self.message_pusher.register_client(id.clone(), sender).await;

        // 3. userCount を全員にブロードキャスト
        let frame = serde_json::to_string(&ServerEvent::UserCount(user_count)).unwrap();
        let targets = self.repository.connected_ids().await;
        let failed = self.message_pusher.broadcast(targets, &frame).await;
        if !failed.is_empty() {
            // 失敗した接続は pusher から外れており、各ソケットタスクが
            // 通常の切断経路（DisconnectClientUseCase）に入る
            tracing::warn!(
                "userCount broadcast failed for {} connection(s)",
                failed.len()
            );
        }

        ConnectedClient {
            id,
            snapshot,
            user_count,
        }
    }
}
