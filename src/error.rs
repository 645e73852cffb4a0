use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析に失敗しました: {0}")]
    AnalysisFailed(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] mediscan_common::Error),
}

impl From<dialoguer::Error> for MediScanError {
    fn from(err: dialoguer::Error) -> Self {
        MediScanError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MediScanError>;
