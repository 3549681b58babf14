//! シート変換ドライバ
//!
//! 読み込んだ行列を 抽出→ツリー組み立て→集計→検証 に通し、
//! シートごとのJSONとして書き出す。シート間に共有状態はないため
//! 並列版はrayonでそのまま分割する。
//!
//! ## 変更履歴
//! - 2026-08-06: 初期作成

use crate::error::{Result, YaoCatalogError};
use dialoguer::MultiSelect;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use yao_catalog_common::{
    build_category_tree, extract_sheet, update_medicine_count, verify_medicines, ColumnMap,
    SheetData,
};

/// 1シート分の変換サマリ
#[derive(Debug, Clone)]
pub struct SheetSummary {
    pub sheet: String,
    /// 薬品数
    pub medicine_count: usize,
    /// ルート分類数
    pub category_count: usize,
    /// 先頭の薬品（名前とlineage）
    pub sample: Option<(String, Vec<String>)>,
    /// 書き出し先（statsでは None）
    pub output_path: Option<PathBuf>,
}

/// 列マッピングを組み立てる（組み込み表 + 上書きファイル）
pub fn load_column_map(override_path: Option<&Path>) -> Result<ColumnMap> {
    let mut columns = ColumnMap::default();
    if let Some(path) = override_path {
        if !path.exists() {
            return Err(YaoCatalogError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        columns
            .merge_json(&content)
            .map_err(|e| YaoCatalogError::InvalidColumnMap(e.to_string()))?;
    }
    Ok(columns)
}

/// 行列をSheetDataに変換する
///
/// 抽出→ツリー組み立て→累計集計→lineage検証の順。
/// 検証に失敗したシートはエラーになり、他のシートには影響しない。
pub fn convert_sheet(
    rows: &[Vec<String>],
    sheet_name: &str,
    columns: &ColumnMap,
) -> Result<SheetData> {
    let extracted = extract_sheet(rows, sheet_name, columns.get(sheet_name));

    let mut categories = build_category_tree(&extracted.categories)?;
    for root in categories.values_mut() {
        update_medicine_count(root);
    }

    verify_medicines(sheet_name, &extracted.medicines)?;

    Ok(SheetData {
        categories,
        medicines: extracted.medicines,
    })
}

/// SheetDataをJSONとして書き出す
pub fn write_sheet_json(
    data: &SheetData,
    sheet_name: &str,
    output_dir: &Path,
    compact: bool,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join(format!("{}.json", sheet_name));
    let json = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    std::fs::write(&output_path, json)?;
    Ok(output_path)
}

/// 変換して書き出し、サマリを返す
pub fn convert_and_write(
    rows: &[Vec<String>],
    sheet_name: &str,
    columns: &ColumnMap,
    output_dir: &Path,
    compact: bool,
) -> Result<SheetSummary> {
    let data = convert_sheet(rows, sheet_name, columns)?;
    let output_path = write_sheet_json(&data, sheet_name, output_dir, compact)?;
    Ok(summarize(sheet_name, &data, Some(output_path)))
}

/// SheetDataからサマリを作る
pub fn summarize(sheet_name: &str, data: &SheetData, output_path: Option<PathBuf>) -> SheetSummary {
    SheetSummary {
        sheet: sheet_name.to_string(),
        medicine_count: data.medicines.len(),
        category_count: data.categories.len(),
        sample: data
            .medicines
            .first()
            .map(|m| (m.name.clone(), m.all_category_codes.clone().unwrap_or_default())),
        output_path,
    }
}

/// 複数シートを並列に変換して書き出す
///
/// 結果はシートの入力順で返る。進捗はプログレスバーで表示
/// （並列時はシート単位のログが交錯するため）。
pub fn convert_sheets_parallel(
    sheets: &[(String, Vec<Vec<String>>)],
    columns: &ColumnMap,
    output_dir: &Path,
    compact: bool,
) -> Vec<(String, Result<SheetSummary>)> {
    let bar = ProgressBar::new(sheets.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} シート")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results: Vec<(String, Result<SheetSummary>)> = sheets
        .par_iter()
        .map(|(sheet_name, rows)| {
            let result = convert_and_write(rows, sheet_name, columns, output_dir, compact);
            bar.inc(1);
            (sheet_name.clone(), result)
        })
        .collect();

    bar.finish_and_clear();
    results
}

/// 変換対象シートを対話的に選択する
pub fn select_sheets_interactive(sheet_names: &[String]) -> Result<Vec<String>> {
    let defaults = vec![true; sheet_names.len()];
    let selection = MultiSelect::new()
        .with_prompt("変換するシートを選択（スペースで切替、Enterで確定）")
        .items(sheet_names)
        .defaults(&defaults)
        .interact()
        .map_err(|e| YaoCatalogError::Interactive(e.to_string()))?;

    Ok(selection
        .into_iter()
        .filter_map(|i| sheet_names.get(i).cloned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use yao_catalog_common::Error;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    /// 名前が2列目にある簡易シート
    fn test_column_map() -> ColumnMap {
        let mut columns = ColumnMap::empty();
        columns
            .merge_json(r#"{"テスト": {"name": [1]}}"#)
            .expect("列マッピング作成失敗");
        columns
    }

    fn scenario_rows() -> Vec<Vec<String>> {
        vec![
            row(&["目録", ""]),
            row(&["コード", "名称"]),
            row(&["A", "Group A"]),
            row(&["", "Pill1"]),
            row(&["A1", "Sub A1"]),
            row(&["", "Pill2"]),
            row(&["B", "Group B"]),
            row(&["", "Pill3"]),
        ]
    }

    #[test]
    fn test_convert_sheet_builds_nested_counts() {
        let data = convert_sheet(&scenario_rows(), "テスト", &test_column_map())
            .expect("変換失敗");

        assert_eq!(data.medicines.len(), 3);
        assert_eq!(data.categories.len(), 2); // ルートは A と B
        let a = &data.categories["A"];
        assert_eq!(a.medicine_count, 2); // 直下1 + A1の1
        assert_eq!(a.subcategories["A1"].medicine_count, 1);
        assert_eq!(data.categories["B"].medicine_count, 1);
    }

    #[test]
    fn test_convert_sheet_rejects_medicine_without_lineage() {
        // 分類より前に薬品行があるシート
        let rows = vec![
            row(&["目録", ""]),
            row(&["コード", "名称"]),
            row(&["", "迷子の薬品"]),
            row(&["A", "Group A"]),
        ];

        let result = convert_sheet(&rows, "テスト", &test_column_map());
        match result {
            Err(YaoCatalogError::Core(Error::MissingCategoryCodes { sheet, index, .. })) => {
                assert_eq!(sheet, "テスト");
                assert_eq!(index, 0);
            }
            other => panic!("想定外の結果: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_write_sheet_json_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir作成失敗");
        let data = convert_sheet(&scenario_rows(), "テスト", &test_column_map())
            .expect("変換失敗");

        let path = write_sheet_json(&data, "テスト", dir.path(), false).expect("書き出し失敗");
        assert_eq!(path, dir.path().join("テスト.json"));

        let content = std::fs::read_to_string(&path).expect("読み戻し失敗");
        let parsed: SheetData = serde_json::from_str(&content).expect("パース失敗");
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_summarize_picks_first_medicine() {
        let data = convert_sheet(&scenario_rows(), "テスト", &test_column_map())
            .expect("変換失敗");
        let summary = summarize("テスト", &data, None);

        assert_eq!(summary.medicine_count, 3);
        assert_eq!(summary.category_count, 2);
        let (name, codes) = summary.sample.expect("サンプルがない");
        assert_eq!(name, "Pill1");
        assert_eq!(codes, vec!["A".to_string()]);
        assert!(summary.output_path.is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = tempfile::tempdir().expect("tempdir作成失敗");
        let columns = test_column_map();
        let sheets = vec![
            ("テスト".to_string(), scenario_rows()),
            ("不明なシート".to_string(), scenario_rows()),
        ];

        let results = convert_sheets_parallel(&sheets, &columns, dir.path(), true);
        assert_eq!(results.len(), 2);
        // 入力順が保たれる
        assert_eq!(results[0].0, "テスト");
        assert!(results[0].1.is_ok());
        // 列マッピングのないシートは薬品0件で成功する
        let summary = results[1].1.as_ref().expect("変換失敗");
        assert_eq!(summary.medicine_count, 0);
        assert!(dir.path().join("不明なシート.json").exists());
    }

    #[test]
    fn test_load_column_map_missing_override_file() {
        let result = load_column_map(Some(Path::new("/nonexistent/colmap.json")));
        assert!(matches!(result, Err(YaoCatalogError::FileNotFound(_))));
    }

    #[test]
    fn test_load_column_map_with_override() {
        let dir = tempfile::tempdir().expect("tempdir作成失敗");
        let path = dir.path().join("colmap.json");
        std::fs::write(&path, r#"{"西药部分": {"name": [0]}}"#).expect("書き込み失敗");

        let columns = load_column_map(Some(&path)).expect("読み込み失敗");
        assert_eq!(
            columns.get("西药部分").expect("西药部分がない").name,
            vec![0]
        );
        // 組み込み表の他のシートは残る
        assert!(columns.get("中成药部分").is_some());
    }
}
