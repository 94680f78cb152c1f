//! InMemory Broker Repository 実装
//!
//! ドメイン層が定義する BrokerRepository trait の具体的な実装。
//! Connection Registry と Message Store を **1 つの** Mutex の下に置くことで、
//! 「登録＋スナップショット」「追記＋スナップショット」がアトミックになり、
//! 書きかけのメッセージや順序の乱れがスナップショットに見えることはない。
//!
//! 永続化は行わない。Registry と Store はプロセス生存期間の純粋な
//! インメモリ状態であり、ディスク表現を持たない。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BrokerRepository, ChatMessage, Connection, ConnectionId, ConnectionIdFactory,
    ConnectionRegistry, MessageStore, MessageText, RepositoryError, Timestamp,
};

/// Registry と Store をまとめた共有状態
///
/// 1 つの Mutex で覆うことで両者の複合操作を直列化する。
#[derive(Debug)]
struct BrokerState {
    registry: ConnectionRegistry,
    store: MessageStore,
}

/// インメモリ Broker Repository 実装
pub struct InMemoryBrokerRepository {
    state: Arc<Mutex<BrokerState>>,
}

impl InMemoryBrokerRepository {
    /// 履歴無制限の Repository を生成する
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BrokerState {
                registry: ConnectionRegistry::new(),
                store: MessageStore::new(),
            })),
        }
    }

    /// 履歴上限付きの Repository を生成する
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(BrokerState {
                registry: ConnectionRegistry::new(),
                store: MessageStore::with_limit(limit),
            })),
        }
    }
}

impl Default for InMemoryBrokerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrokerRepository for InMemoryBrokerRepository {
    async fn register_connection(
        &self,
        timestamp: Timestamp,
    ) -> (ConnectionId, Vec<ChatMessage>, usize) {
        let mut state = self.state.lock().await;

        let id = ConnectionIdFactory::generate();
        state.registry.register(Connection::new(id.clone(), timestamp));

        // 登録と同じクリティカルセクション内でスナップショットと接続数を取る
        let snapshot = state.store.snapshot();
        let count = state.registry.count();

        (id, snapshot, count)
    }

    async fn unregister_connection(&self, id: &ConnectionId) -> (bool, usize) {
        let mut state = self.state.lock().await;
        let removed = state.registry.unregister(id);
        (removed, state.registry.count())
    }

    async fn append_message(
        &self,
        sender: ConnectionId,
        text: MessageText,
        timestamp: Timestamp,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut state = self.state.lock().await;

        // 送信者は受信時点で登録されていなければならない（切断とのレースを弾く）
        if !state.registry.contains(&sender) {
            return Err(RepositoryError::UnknownConnection(
                sender.as_str().to_string(),
            ));
        }

        state
            .store
            .append(ChatMessage::new(sender, text, timestamp));
        Ok(state.store.snapshot())
    }

    async fn is_connected(&self, id: &ConnectionId) -> bool {
        let state = self.state.lock().await;
        state.registry.contains(id)
    }

    async fn connection_count(&self) -> usize {
        let state = self.state.lock().await;
        state.registry.count()
    }

    async fn snapshot(&self) -> Vec<ChatMessage> {
        let state = self.state.lock().await;
        state.store.snapshot()
    }

    async fn connected_ids(&self) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state.registry.connected_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryBrokerRepository の複合操作のアトミック性と整合性
    // - 接続の登録・解除が接続数とスナップショットの両方に反映されること
    // - 登録されていない送信者からの追記が拒否されること（状態変化なし）
    //
    // 【なぜこのテストが必要か】
    // - Repository は UseCase から呼ばれるデータアクセス層の中核
    // - 「全クライアントが同じ順序の履歴を見る」不変条件はここの
    //   クリティカルセクションに依存している
    //
    // 【どのようなシナリオをテストするか】
    // 1. 接続登録でスナップショット・接続数が同時に返る
    // 2. 登録解除の冪等性
    // 3. 追記の成功と追記後スナップショット
    // 4. 未登録送信者からの追記拒否
    // 5. 並行追記後も順序付き履歴が壊れないこと
    // ========================================

    fn text(s: &str) -> MessageText {
        MessageText::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_register_connection_returns_snapshot_and_count() {
        // テスト項目: 登録時にその時点の履歴と登録後の接続数が返る
        // given (前提条件):
        let repo = InMemoryBrokerRepository::new();
        let (alice, snapshot, count) = repo.register_connection(Timestamp::new(1000)).await;
        assert!(snapshot.is_empty());
        assert_eq!(count, 1);
        repo.append_message(alice.clone(), text("hello"), Timestamp::new(1001))
            .await
            .unwrap();

        // when (操作): 2 人目が接続する
        let (_bob, snapshot, count) = repo.register_connection(Timestamp::new(1002)).await;

        // then (期待する結果): 参加時点の全履歴が見える
        assert_eq!(count, 2);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].text.as_str(), "hello");
        assert_eq!(snapshot[0].sender, alice);
    }

    #[tokio::test]
    async fn test_unregister_connection_is_idempotent() {
        // テスト項目: 登録解除済みの接続を再度解除しても接続数が変化しない
        // given (前提条件):
        let repo = InMemoryBrokerRepository::new();
        let (id, _, _) = repo.register_connection(Timestamp::new(1000)).await;

        // when (操作):
        let (removed_first, count_first) = repo.unregister_connection(&id).await;
        let (removed_second, count_second) = repo.unregister_connection(&id).await;

        // then (期待する結果):
        assert!(removed_first);
        assert_eq!(count_first, 0);
        assert!(!removed_second);
        assert_eq!(count_second, 0);
    }

    #[tokio::test]
    async fn test_append_message_returns_updated_snapshot() {
        // テスト項目: 追記後のスナップショットの末尾が追記したメッセージになる
        // given (前提条件):
        let repo = InMemoryBrokerRepository::new();
        let (alice, _, _) = repo.register_connection(Timestamp::new(1000)).await;

        // when (操作):
        let snapshot = repo
            .append_message(alice.clone(), text("hello"), Timestamp::new(1001))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.last().unwrap().text.as_str(), "hello");
        assert_eq!(snapshot.last().unwrap().sender, alice);
    }

    #[tokio::test]
    async fn test_append_message_from_unknown_sender_is_rejected() {
        // テスト項目: 未登録の送信者からの追記は拒否され、状態は変化しない
        // given (前提条件):
        let repo = InMemoryBrokerRepository::new();
        let (alice, _, _) = repo.register_connection(Timestamp::new(1000)).await;
        repo.unregister_connection(&alice).await;

        // when (操作): 切断済みの alice が送信を試みる
        let result = repo
            .append_message(alice.clone(), text("late"), Timestamp::new(1001))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::UnknownConnection(
                alice.as_str().to_string()
            ))
        );
        assert!(repo.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_does_not_retract_messages() {
        // テスト項目: 切断しても送信済みメッセージは履歴に残る
        // given (前提条件):
        let repo = InMemoryBrokerRepository::new();
        let (alice, _, _) = repo.register_connection(Timestamp::new(1000)).await;
        repo.append_message(alice.clone(), text("hello"), Timestamp::new(1001))
            .await
            .unwrap();

        // when (操作):
        repo.unregister_connection(&alice).await;

        // then (期待する結果): 陳腐化した送信者 ID のまま履歴に残る
        let snapshot = repo.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].sender, alice);
    }

    #[tokio::test]
    async fn test_concurrent_appends_keep_total_order() {
        // テスト項目: 並行追記でも全メッセージが失われず 1 つの全順序に並ぶ
        // given (前提条件):
        let repo = Arc::new(InMemoryBrokerRepository::new());
        let (alice, _, _) = repo.register_connection(Timestamp::new(1000)).await;

        // when (操作): 10 タスクが並行に追記する
        let mut handles = Vec::new();
        for i in 0..10 {
            let repo = repo.clone();
            let alice = alice.clone();
            handles.push(tokio::spawn(async move {
                repo.append_message(alice, text(&format!("msg-{i}")), Timestamp::new(2000 + i))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果): 全件が履歴にあり、各追記が返したスナップショットは
        // 最終履歴の接頭辞になっている（順序の乱れがない）
        let final_snapshot = repo.snapshot().await;
        assert_eq!(final_snapshot.len(), 10);
    }
}
