//! UseCase: ルーム状態取得（読み取り専用）
//!
//! HTTP ポーリング用フォールバックから使われる。状態を変更しないが、
//! 接続数と履歴が同じ時点のビューになるようシーケンサの区間内で読む。

use std::sync::Arc;

use crate::domain::{BrokerRepository, ChatMessage};

use super::sequencer::Sequencer;

/// ルーム状態のスナップショット
#[derive(Debug)]
pub struct RoomState {
    /// 現在の接続数
    pub user_count: usize,
    /// 全メッセージ履歴（受理順）
    pub messages: Vec<ChatMessage>,
}

/// ルーム状態取得のユースケース
pub struct GetRoomStateUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn BrokerRepository>,
    /// 他の状態遷移と重ならない一貫した読み取りのため
    sequencer: Arc<Sequencer>,
}

impl GetRoomStateUseCase {
    /// 新しい GetRoomStateUseCase を作成
    pub fn new(repository: Arc<dyn BrokerRepository>, sequencer: Arc<Sequencer>) -> Self {
        Self {
            repository,
            sequencer,
        }
    }

    /// 現在のルーム状態を取得する
    pub async fn execute(&self) -> RoomState {
        let _guard = self.sequencer.acquire().await;
        RoomState {
            user_count: self.repository.connection_count().await,
            messages: self.repository.snapshot().await,
        }
    }
}
