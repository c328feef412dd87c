//! エラー型定義

use thiserror::Error;

/// 照合エンジンの共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    /// マスタに必須列がない
    #[error("Missing column '{column}' in {table}")]
    MissingColumn { column: String, table: String },

    /// キャンセルフラグにより中断（レコード間でのみ判定）
    #[error("Reconciliation cancelled after {completed} of {total} records")]
    Cancelled { completed: usize, total: usize },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
