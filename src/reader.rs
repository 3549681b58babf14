//! Excelワークブック読み込み
//!
//! calamineで.xlsxを開き、シートを文字列の行列として取り出す。
//! calamineのRangeは使用領域の左上から始まるため、行・列番号が
//! 元シートの絶対位置と一致するよう先頭を空セルで埋める
//! （薬品idはシートの絶対行番号から作られる）。

use crate::error::{Result, YaoCatalogError};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "XLSX", "XLSM"];

/// 開いたワークブック
pub struct Workbook {
    inner: Xlsx<BufReader<File>>,
}

impl Workbook {
    /// ワークブックを開く
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(YaoCatalogError::FileNotFound(path.display().to_string()));
        }
        let inner: Xlsx<_> = open_workbook(path)?;
        Ok(Self { inner })
    }

    /// シート名の一覧（ワークブック順）
    pub fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    /// 1シートを行列として取り出す
    pub fn sheet_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>> {
        let range = self.inner.worksheet_range(sheet_name)?;
        Ok(range_to_rows(&range))
    }
}

/// Rangeを絶対位置合わせ済みの行列に変換する
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (row_offset, col_offset) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Vec::new(), // 空シート
    };

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(cell_to_string));
        rows.push(cells);
    }
    rows
}

/// セル値を文字列化する
///
/// 整数値のFloatは小数点なしで表記する（数値セルの分類コードが
/// "1.0" ではなく "1" になるように）。エラーセルは空扱い。
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// フォルダ直下のワークブックを検索する
///
/// Excelのロックファイル（~$で始まる）は除外。ファイル名順。
pub fn find_workbooks(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(YaoCatalogError::FolderNotFound(folder.display().to_string()));
    }

    let mut workbooks = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if file_name.starts_with("~$") {
            continue;
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy();
            if WORKBOOK_EXTENSIONS.iter().any(|&e| e == ext_str) {
                workbooks.push(path.to_path_buf());
            }
        }
    }

    workbooks.sort();

    if workbooks.is_empty() {
        return Err(YaoCatalogError::NoWorkbooksFound(folder.display().to_string()));
    }

    Ok(workbooks)
}
