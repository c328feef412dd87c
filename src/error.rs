use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("マスタが指定されていません。`--master` か `sku-validator config --set-master <URL>` で指定してください")]
    MissingMaster,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応のファイル形式: {0}")]
    UnsupportedFormat(String),

    #[error("マスタを取得できません: {0}")]
    MasterUnavailable(String),

    #[error("マスタファイルが不正: {0}")]
    InvalidMaster(String),

    #[error("入力ファイルの読み込みエラー: {0}")]
    InputRead(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("処理が中断されました: {0}")]
    Interrupted(String),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] sku_validator_common::Error),
}

impl From<rust_xlsxwriter::XlsxError> for ValidatorError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ValidatorError::ExcelGeneration(err.to_string())
    }
}

impl From<calamine::Error> for ValidatorError {
    fn from(err: calamine::Error) -> Self {
        ValidatorError::InputRead(err.to_string())
    }
}

impl From<reqwest::Error> for ValidatorError {
    fn from(err: reqwest::Error) -> Self {
        ValidatorError::MasterUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
