//! Connection Registry（接続レジストリ）
//!
//! 現在開いているトランスポート接続の集合を管理する。
//! ユーザー数（`userCount`）の唯一の情報源であり、
//! メンバーシップ変更のたびにサイズから再計算される（独立した保存はしない）。

use std::collections::HashMap;

use super::entity::Connection;
use super::value_object::ConnectionId;

/// 接続レジストリ
///
/// ## 不変条件
///
/// - メンバーシップは「現在開いている接続」の集合と常に一致する
/// - 重複 ID・陳腐化した ID を含まない
/// - `unregister` は冪等（重複・遅延した切断通知を許容する）
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// 接続中のクライアント
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    /// 空のレジストリを生成する
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// 接続を登録する
    ///
    /// ID の採番は呼び出し側（Repository）が `ConnectionIdFactory` で行う。
    pub fn register(&mut self, connection: Connection) {
        self.connections.insert(connection.id.clone(), connection);
    }

    /// 接続を登録解除する
    ///
    /// # Returns
    ///
    /// * `true` - 接続が存在し、削除された
    /// * `false` - 接続が存在しなかった（no-op、エラーではない）
    pub fn unregister(&mut self, id: &ConnectionId) -> bool {
        self.connections.remove(id).is_some()
    }

    /// 現在の接続数を返す（読み取りのみ）
    pub fn count(&self) -> usize {
        self.connections.len()
    }

    /// 接続が登録されているかを返す
    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// 接続中の全ての接続 ID を返す（ブロードキャスト対象の列挙用）
    pub fn connected_ids(&self) -> Vec<ConnectionId> {
        self.connections.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{ConnectionIdFactory, Timestamp};

    fn create_test_connection() -> Connection {
        Connection::new(ConnectionIdFactory::generate(), Timestamp::new(1000))
    }

    #[test]
    fn test_register_increases_count() {
        // テスト項目: 接続を登録すると count が 1 増える
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        assert_eq!(registry.count(), 0);

        // when (操作):
        let connection = create_test_connection();
        registry.register(connection.clone());

        // then (期待する結果):
        assert_eq!(registry.count(), 1);
        assert!(registry.contains(&connection.id));
    }

    #[test]
    fn test_count_tracks_each_connect() {
        // テスト項目: 任意の接続列に対して count が常に現在の接続数と一致する
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();

        // when (操作) / then (期待する結果):
        for expected in 1..=5 {
            registry.register(create_test_connection());
            assert_eq!(registry.count(), expected);
        }
    }

    #[test]
    fn test_unregister_decreases_count() {
        // テスト項目: 登録済みの接続を解除すると count が 1 減る
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let connection = create_test_connection();
        registry.register(connection.clone());
        registry.register(create_test_connection());

        // when (操作):
        let removed = registry.unregister(&connection.id);

        // then (期待する結果):
        assert!(removed);
        assert_eq!(registry.count(), 1);
        assert!(!registry.contains(&connection.id));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        // テスト項目: 登録解除済みの接続を再度解除しても count が変化しない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let connection = create_test_connection();
        registry.register(connection.clone());
        registry.unregister(&connection.id);
        assert_eq!(registry.count(), 0);

        // when (操作): 同じ接続をもう一度解除する
        let removed = registry.unregister(&connection.id);

        // then (期待する結果): no-op（エラーではない）
        assert!(!removed);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_connected_ids_returns_all_live_connections() {
        // テスト項目: connected_ids が接続中の全 ID を返す
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let a = create_test_connection();
        let b = create_test_connection();
        registry.register(a.clone());
        registry.register(b.clone());

        // when (操作):
        let ids = registry.connected_ids();

        // then (期待する結果):
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a.id));
        assert!(ids.contains(&b.id));
    }
}
