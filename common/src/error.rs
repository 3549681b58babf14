//! エラー型定義

use thiserror::Error;

/// 変換コアの共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("分類ツリーの構築に失敗: {0}")]
    Tree(String),

    #[error("{sheet} の {index} 番目の薬品に all_category_codes がありません: {name}")]
    MissingCategoryCodes {
        sheet: String,
        index: usize,
        name: String,
    },

    #[error("列マッピングが不正: {0}")]
    ColumnMap(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
