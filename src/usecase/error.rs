//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ValidationError;

/// メッセージ送信処理のエラー
///
/// いずれもローカルで回復する（メッセージ破棄、状態変化なし）。
/// クライアントに構造化エラーは返さない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// 本文の検証失敗（空 / 文字数超過）
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 登録されていない接続からの送信（切断とのレース）
    #[error("unknown connection: {0}")]
    UnknownConnection(String),
}
