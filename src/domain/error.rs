//! ドメイン層のエラー定義
//!
//! いずれもローカルで回復可能なエラー：
//! - `ValidationError` … メッセージ本文の検証失敗（ローカルで回復、状態変化なし）
//! - `RepositoryError::UnknownConnection` … 切断済み接続からのイベント（no-op で回復）

use thiserror::Error;

/// メッセージ本文の検証エラー
///
/// どちらの場合もメッセージは破棄され、状態は変化しない。
/// クライアントには構造化エラーを返さない（既存クライアントの契約）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// トリム後に空のメッセージ
    #[error("message is empty after trimming")]
    Empty,

    /// 最大文字数超過
    #[error("message is too long: {actual} chars (max: {max})")]
    TooLong { actual: usize, max: usize },
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// 登録されていない接続からの操作（切断とのレース）
    ///
    /// 致命的ではない。呼び出し側は no-op として回復する。
    #[error("unknown connection: {0}")]
    UnknownConnection(String),
}
