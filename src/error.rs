use thiserror::Error;

#[derive(Error, Debug)]
pub enum YaoCatalogError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("Excelファイルが見つかりません: {0}")]
    NoWorkbooksFound(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    Excel(#[from] calamine::XlsxError),

    #[error("列マッピングファイルが不正: {0}")]
    InvalidColumnMap(String),

    #[error("対話入力エラー: {0}")]
    Interactive(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("変換エラー: {0}")]
    Core(#[from] yao_catalog_common::Error),
}

pub type Result<T> = std::result::Result<T, YaoCatalogError>;
