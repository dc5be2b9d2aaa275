// Custom error types for progress tracking
// 進捗処理専用のカスタムエラー型定義

use thiserror::Error;

/// 進捗処理固有のエラー型
///
/// 個々のアクションの失敗はここには含まれない。
/// アイテム単位の失敗は `anyhow::Error` としてフックへ渡され、実行全体は止まらない。
#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("バリデーションエラー: {field} - {reason}")]
    ValidationError { field: String, reason: String },
}

impl ProgressError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// バリデーションエラーの作成
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 進捗処理の結果型
pub type ProgressResult<T> = std::result::Result<T, ProgressError>;
