//! Yao Catalog Common Library
//!
//! CLIドライバから使われる変換コア:
//! 分類ツリーの構築・薬品抽出の型とロジック（I/Oなし）

pub mod types;
pub mod colmap;
pub mod extract;
pub mod tree;
pub mod validate;
pub mod error;

pub use types::{Category, Medicine, SheetData};
pub use colmap::{ColumnMap, ColumnSpec, SheetColumns};
pub use extract::{clean_cell, extract_sheet, ExtractedSheet};
pub use tree::{build_category_tree, update_medicine_count};
pub use validate::verify_medicines;
pub use error::{Error, Result};
