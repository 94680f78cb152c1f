//! Message Store（メッセージストア）
//!
//! ブローカーが受理したメッセージの追記専用・順序付き履歴。
//! この順序が唯一のグローバル順序であり、全クライアントに配送される
//! スナップショットは必ずこの順序を反映する（後から参加したクライアントも
//! 全履歴を受け取る）。
//!
//! ## 履歴上限（任意）
//!
//! デフォルトはプロセス生存期間の全履歴を保持する（観測されたクライアント
//! 契約に一致）。`with_limit` で上限を設定した場合は古いものから追い出し、
//! 「後から参加したクライアントは連続した直近の履歴を見る」性質を保つ。

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// メッセージストア
#[derive(Debug, Default)]
pub struct MessageStore {
    /// 受理順のメッセージ履歴
    messages: VecDeque<ChatMessage>,
    /// 履歴の上限（None は無制限）
    limit: Option<usize>,
}

impl MessageStore {
    /// 無制限のメッセージストアを生成する
    pub fn new() -> Self {
        Self {
            messages: VecDeque::new(),
            limit: None,
        }
    }

    /// 履歴上限付きのメッセージストアを生成する
    ///
    /// 上限に達すると最も古いメッセージから追い出す。上限 0 は何も保持しない。
    pub fn with_limit(limit: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// メッセージを受理順に追記する
    ///
    /// 追記されたメッセージは以後不変。
    pub fn append(&mut self, message: ChatMessage) {
        if let Some(limit) = self.limit {
            // 上限 0 は履歴を一切保持しない
            if limit == 0 {
                return;
            }
            while self.messages.len() >= limit {
                self.messages.pop_front();
            }
        }
        self.messages.push_back(message);
    }

    /// 全履歴を受理順で返す
    ///
    /// 新規参加・再接続クライアントへの配送、および受理後の全員への
    /// 再ブロードキャストに使う。呼び出し時点の一貫したビューを返す
    /// （排他制御は Repository 側の Mutex が担う）。
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    /// 現在の履歴件数を返す
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// 履歴が空かを返す
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
