//! ドメイン層の Value Object 定義
//!
//! 接続 ID・メッセージ本文・タイムスタンプを型として表現します。
//! 不正な値はコンストラクタで弾くため、Value Object が存在する時点で
//! バリデーション済みであることが保証されます。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

/// メッセージ本文の最大文字数
///
/// クライアント側の入力欄が `maxLength={500}` で制限しているため、
/// サーバ側も同じ上限で再検証する（クライアントを信用しない）。
/// 文字数は Unicode スカラ値で数える。
pub const MAX_MESSAGE_CHARS: usize = 500;

/// 接続 ID（Value Object）
///
/// トランスポート接続ごとに採番される一時的な識別子。
/// プロセスの生存期間内で再利用されない（UUID v4）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 接続 ID のファクトリ
///
/// ID の採番ロジックを一箇所に集約する。
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// 新しい接続 ID を採番する
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// メッセージ本文（Value Object）
///
/// 前後の空白を除去した上で、空でないこと・最大文字数以内であることを保証する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// メッセージ本文を検証して生成する
    ///
    /// # Returns
    ///
    /// * `Ok(MessageText)` - 検証済みの本文（トリム済み）
    /// * `Err(ValidationError::Empty)` - トリム後に空
    /// * `Err(ValidationError::TooLong)` - 最大文字数超過
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = raw.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }
        let chars = trimmed.chars().count();
        if chars > MAX_MESSAGE_CHARS {
            return Err(ValidationError::TooLong {
                actual: chars,
                max: MAX_MESSAGE_CHARS,
            });
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

/// タイムスタンプ（Value Object）
///
/// Unix epoch ミリ秒（UTC）。受信時点の時刻をブローカーが採取する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_factory_generates_unique_ids() {
        // テスト項目: ConnectionIdFactory が一意な ID を採番する
        // given (前提条件):

        // when (操作):
        let id1 = ConnectionIdFactory::generate();
        let id2 = ConnectionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_message_text_trims_surrounding_whitespace() {
        // テスト項目: 前後の空白が除去される
        // given (前提条件):
        let raw = "  hello  ";

        // when (操作):
        let text = MessageText::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(text.as_str(), "hello");
    }

    #[test]
    fn test_message_text_rejects_empty_string() {
        // テスト項目: 空文字列は ValidationError::Empty になる
        // given (前提条件):
        let raw = "";

        // when (操作):
        let result = MessageText::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::Empty));
    }

    #[test]
    fn test_message_text_rejects_whitespace_only_string() {
        // テスト項目: 空白のみの文字列は ValidationError::Empty になる
        // given (前提条件):
        let raw = " \t\n  ";

        // when (操作):
        let result = MessageText::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::Empty));
    }

    #[test]
    fn test_message_text_accepts_exactly_max_chars() {
        // テスト項目: ちょうど 500 文字のメッセージは受理される
        // given (前提条件):
        let raw = "a".repeat(MAX_MESSAGE_CHARS);

        // when (操作):
        let result = MessageText::new(raw);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str().chars().count(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn test_message_text_rejects_over_max_chars() {
        // テスト項目: 501 文字のメッセージは ValidationError::TooLong になる
        // given (前提条件):
        let raw = "a".repeat(MAX_MESSAGE_CHARS + 1);

        // when (操作):
        let result = MessageText::new(raw);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValidationError::TooLong {
                actual: MAX_MESSAGE_CHARS + 1,
                max: MAX_MESSAGE_CHARS,
            })
        );
    }

    #[test]
    fn test_message_text_counts_unicode_scalar_values() {
        // テスト項目: 文字数はバイト数ではなく Unicode スカラ値で数える
        // given (前提条件): マルチバイト文字 500 文字（バイト数では 1500）
        let raw = "あ".repeat(MAX_MESSAGE_CHARS);

        // when (操作):
        let result = MessageText::new(raw);

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
