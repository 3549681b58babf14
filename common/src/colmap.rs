//! シート別の列マッピング
//!
//! シート名→「どの列がどの項目か」の対応表。
//! 元データのレイアウトはシート種別ごとに固定で、
//! 対応表にないシートは分類のみ抽出され薬品行は全て捨てられる。

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 列指定
///
/// 単一列か複数列かで項目の取り方が変わる:
/// 単一列はセル値をそのまま、複数列は非空値を「；」で連結する。
/// JSONでは `17` と `[16, 17, 18]` の両方の形を受け付ける。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    /// 単一列
    Single(usize),
    /// 複数列
    Multiple(Vec<usize>),
}

/// 1シート分の列マッピング（0始まりの列番号）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetColumns {
    /// 薬品名の候補列（先に非空だった列を採用）
    pub name: Vec<usize>,
    /// 剤型
    pub dosage: Option<usize>,
    /// 支払基準（非空値をリストで収集）
    pub payment_standard: Option<Vec<usize>>,
    /// 備考
    pub note: Option<ColumnSpec>,
    /// 協議有効期間
    pub validity_period: Option<usize>,
}

lazy_static! {
    /// 組み込みの対応表（医保薬品目録の5シート）
    static ref DEFAULT_SHEET_COLUMNS: HashMap<&'static str, SheetColumns> = {
        let mut map = HashMap::new();
        map.insert(
            "西药部分",
            SheetColumns {
                name: vec![13, 14],
                dosage: Some(15),
                note: Some(ColumnSpec::Single(17)),
                ..Default::default()
            },
        );
        map.insert(
            "中成药部分",
            SheetColumns {
                name: vec![13, 14, 15],
                note: Some(ColumnSpec::Multiple(vec![16, 17, 18])),
                ..Default::default()
            },
        );
        // 協議・競価シートはレイアウト共通
        let negotiated = SheetColumns {
            name: vec![12, 13],
            payment_standard: Some(vec![14, 15, 16]),
            note: Some(ColumnSpec::Single(17)),
            validity_period: Some(18),
            ..Default::default()
        };
        map.insert("协议西药", negotiated.clone());
        map.insert("协议中成药", negotiated.clone());
        map.insert("竞价药品部分", negotiated);
        map
    };
}

/// シート名→列マッピングの対応表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMap(HashMap<String, SheetColumns>);

impl Default for ColumnMap {
    fn default() -> Self {
        Self(
            DEFAULT_SHEET_COLUMNS
                .iter()
                .map(|(name, columns)| (name.to_string(), columns.clone()))
                .collect(),
        )
    }
}

impl ColumnMap {
    /// 空の対応表
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// シートの列マッピングを取得
    pub fn get(&self, sheet_name: &str) -> Option<&SheetColumns> {
        self.0.get(sheet_name)
    }

    /// 登録済みシート名の一覧（ソート済み）
    pub fn sheet_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.0.keys().map(|name| name.as_str()).collect();
        names.sort();
        names
    }

    /// JSON定義で上書き・追加する
    ///
    /// 形式: `{"シート名": {"name": [13, 14], "note": 17, ...}}`
    pub fn merge_json(&mut self, json: &str) -> Result<()> {
        let overrides: HashMap<String, SheetColumns> =
            serde_json::from_str(json).map_err(|e| Error::ColumnMap(e.to_string()))?;
        self.0.extend(overrides);
        Ok(())
    }
}
