//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// 画像として読み込めない（寸法取得に失敗）
    #[error("Decode error: {0}")]
    Decode(String),

    /// 解析パイプライン中のその他の失敗
    #[error("Analysis rejected: {0}")]
    AnalysisRejected(String),

    #[error("Object URL error: {0}")]
    ObjectUrl(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
