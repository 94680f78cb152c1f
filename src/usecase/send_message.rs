//! UseCase: メッセージ送信処理
//!
//! 受信メッセージのプロトコル（既存クライアントの契約）：
//!
//! 1. 送信者が登録されていなければ no-op で拒否する（切断とのレース、致命的ではない）
//! 2. 本文をトリムし、空なら黙って破棄する（クライアント側にも同じガードが
//!    あるが、サーバはクライアントを信用せず再検証する）
//! 3. 検証に通れば受信時刻を採取して Message Store に追記する
//! 4. 追記後の **全** スナップショットを接続中の全クライアントに
//!    ブロードキャストする（差分ではなく全履歴、観測された契約）
//!
//! 追記とブロードキャストのエンキューはシーケンサの 1 区間で行い、
//! どのクライアントにも古いスナップショットが新しいものより後に
//! 積まれないことを保証する。

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    BrokerRepository, ConnectionId, MessagePusher, MessageText, RepositoryError, Timestamp,
};
use crate::infrastructure::dto::conversion::snapshot_to_event;

use super::error::SendMessageError;
use super::sequencer::Sequencer;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn BrokerRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 時刻の抽象化
    clock: Arc<dyn Clock>,
    /// 状態遷移＋ブロードキャストの直列化
    sequencer: Arc<Sequencer>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
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

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender_id` - 送信者の接続 ID
    /// * `raw_text` - クライアントから届いた生の本文（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 受理してブロードキャスト済み
    /// * `Err(SendMessageError)` - 破棄（状態変化なし）。呼び出し側は
    ///   ログ出力以上のことはしない（クライアントには通知しない契約）
    pub async fn execute(
        &self,
        sender_id: &ConnectionId,
        raw_text: &str,
    ) -> Result<(), SendMessageError> {
        // 検証は状態に触れないため区間の外で行う
        let text = MessageText::new(raw_text)?;

        let _guard = self.sequencer.acquire().await;

        // 追記＋追記後スナップショット取得（アトミック）
        let timestamp = Timestamp::new(self.clock.now_millis());
        let snapshot = self
            .repository
            .append_message(sender_id.clone(), text, timestamp)
            .await
            .map_err(|RepositoryError::UnknownConnection(id)| {
                SendMessageError::UnknownConnection(id)
            })?;

        // 全員（送信者を含む）に全履歴をブロードキャスト
        let frame = serde_json::to_string(&snapshot_to_event(snapshot)).unwrap();
        let targets = self.repository.connected_ids().await;
        let failed = self.message_pusher.broadcast(targets, &frame).await;
        if !failed.is_empty() {
            tracing::warn!(
                "chatMessages broadcast failed for {} connection(s)",
                failed.len()
            );
        }

        Ok(())
    }
}
