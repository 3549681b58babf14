//! 行分類と分類スタック
//!
//! シートの行を順に読み、分類ヘッダ行と薬品行を振り分ける。
//! 分類の親子関係はコードの文字数だけで決まる:
//! 新コード以上の長さのスタック要素を全て閉じ、残った先頭が親になる。
//! コード同士が文字列として前方一致している必要はない（実データの
//! 目録はこの規則で整合するため、前方一致の検査は行わない）。

use crate::colmap::{ColumnSpec, SheetColumns};
use crate::types::{Category, Medicine};
use std::collections::BTreeMap;

/// 複数列 note の連結区切り
const NOTE_DELIMITER: &str = "；";

/// ヘッダとして読み飛ばす先頭行数
const HEADER_ROWS: usize = 2;

/// 抽出結果（ツリー組み立て前）
#[derive(Debug, Clone, Default)]
pub struct ExtractedSheet {
    /// コード→分類のフラットな registry
    pub categories: BTreeMap<String, Category>,
    /// 行順を保った薬品リスト
    pub medicines: Vec<Medicine>,
}

/// セル値を取得して整形する
///
/// 行の範囲外の列は空文字列になる。
pub fn clean_cell(row: &[String], index: usize) -> String {
    row.get(index)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// 1シート分の行から分類と薬品を抽出する
///
/// 先頭2行はヘッダとして読み飛ばす。先頭セルが非空の行は分類、
/// それ以外は薬品の候補。列マッピングがないシートでは薬品名が
/// 解決できないため、分類だけが集まり薬品は出ない。
pub fn extract_sheet(
    rows: &[Vec<String>],
    sheet_name: &str,
    columns: Option<&SheetColumns>,
) -> ExtractedSheet {
    let mut categories: BTreeMap<String, Category> = BTreeMap::new();
    let mut medicines: Vec<Medicine> = Vec::new();
    let mut stack: Vec<String> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        if idx < HEADER_ROWS {
            continue;
        }
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let first_col = clean_cell(row, 0);

        // 分類行
        if !first_col.is_empty() {
            push_category(first_col, row, &mut categories, &mut stack);
            continue;
        }

        // 薬品行
        let Some(columns) = columns else {
            continue;
        };
        let name = columns
            .name
            .iter()
            .map(|&i| clean_cell(row, i))
            .find(|value| !value.is_empty())
            .unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        let mut medicine = Medicine {
            id: format!("{}_{}", sheet_name, idx),
            name,
            sheet: sheet_name.to_string(),
            ..Default::default()
        };

        // 分類の帰属: スタック先頭が最も近い分類
        if let Some(code) = stack.last().cloned() {
            medicine.all_category_codes = Some(stack.clone());
            if let Some(category) = categories.get_mut(&code) {
                medicine.category_name = Some(category.name.clone());
                category.medicine_count += 1;
            }
            medicine.category_code = Some(code);
        }

        apply_optional_fields(&mut medicine, row, columns);
        medicines.push(medicine);
    }

    ExtractedSheet {
        categories,
        medicines,
    }
}

/// 分類ヘッダ行を registry に登録し、スタックを更新する
fn push_category(
    code: String,
    row: &[String],
    categories: &mut BTreeMap<String, Category>,
    stack: &mut Vec<String>,
) {
    // 分類名は2列目以降で最初の非空セル
    let name = (1..row.len())
        .map(|i| clean_cell(row, i))
        .find(|value| !value.is_empty())
        .unwrap_or_default();

    // 新コード以上の長さの分類を全て閉じる
    let code_len = code.chars().count();
    while let Some(top) = stack.last() {
        if code_len <= top.chars().count() {
            stack.pop();
        } else {
            break;
        }
    }

    let parent_code = stack.last().cloned();
    let level = stack.len() as u32 + 1;

    categories.insert(
        code.clone(),
        Category {
            code: code.clone(),
            name,
            level,
            parent_code,
            subcategories: BTreeMap::new(),
            medicine_count: 0,
        },
    );
    stack.push(code);
}

/// 列マッピングに従って薬品の任意項目を埋める
fn apply_optional_fields(medicine: &mut Medicine, row: &[String], columns: &SheetColumns) {
    if let Some(i) = columns.dosage {
        medicine.dosage = Some(clean_cell(row, i));
    }
    if let Some(indices) = &columns.payment_standard {
        let values: Vec<String> = indices
            .iter()
            .map(|&i| clean_cell(row, i))
            .filter(|value| !value.is_empty())
            .collect();
        medicine.payment_standard = Some(values);
    }
    if let Some(note_columns) = &columns.note {
        medicine.note = Some(match note_columns {
            ColumnSpec::Single(i) => clean_cell(row, *i),
            ColumnSpec::Multiple(indices) => indices
                .iter()
                .map(|&i| clean_cell(row, i))
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join(NOTE_DELIMITER),
        });
    }
    if let Some(i) = columns.validity_period {
        medicine.validity_period = Some(clean_cell(row, i));
    }
}
