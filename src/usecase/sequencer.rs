//! Broadcast sequencer（ブロードキャスト直列化）
//!
//! ブローカーのクライアントから見える契約は「全観測者で一貫した、
//! 権威ある全履歴と接続数」である。そのため、接続・受信メッセージ・切断の
//! 各処理は **状態変更とそのブロードキャストのエンキューまで** を
//! 1 つのクリティカルセクションで実行し、全状態遷移を 1 つの全順序に並べる。
//!
//! これがないと、追記 → スナップショット → エンキューの間に別の追記が
//! 割り込み、あるクライアントのキューに新しいスナップショットより後から
//! 古いスナップショットが積まれ得る（順序の逆転）。
//!
//! 各接続のキューは FIFO なので、エンキューが直列化されていれば
//! 配送順序もこの全順序に一致する。

use tokio::sync::{Mutex, MutexGuard};

/// 状態遷移とブロードキャストを直列化するシーケンサ
#[derive(Debug, Default)]
pub struct Sequencer {
    lock: Mutex<()>,
}

impl Sequencer {
    /// 新しいシーケンサを生成する
    pub fn new() -> Self {
        Self { lock: Mutex::new(()) }
    }

    /// クリティカルセクションに入る
    ///
    /// ガードを保持している間、他の状態遷移は開始されない。
    /// ガード保持中の送信は全て非ブロッキング（`try_send`）であること。
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}
