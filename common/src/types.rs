//! 変換結果の型定義
//!
//! シートごとのJSONに書き出される型:
//! - Category: 分類ノード（組み立て後はツリー）
//! - Medicine: 薬品1行
//! - SheetData: シート単位の最終出力

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 分類ノード
///
/// 抽出直後はフラットな registry に入り subcategories は空。
/// ツリー組み立てで子がぶら下がり、medicine_count は
/// 集計パスで子孫込みの累計値に置き換わる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    /// 分類コード（文字数が階層の深さを表す）
    pub code: String,
    /// 表示名（コードの右側で最初の非空セル）
    pub name: String,
    /// 階層レベル（1 = ルート）
    pub level: u32,
    /// 親分類のコード（ルートは null）
    pub parent_code: Option<String>,
    /// 子分類（コード→ノード）
    pub subcategories: BTreeMap<String, Category>,
    /// 直下の薬品数（集計後は子孫込みの累計）
    pub medicine_count: u32,
}

/// 薬品1行
///
/// 任意項目はシートの列マッピングに定義がある場合のみ出力される。
/// 分類が一つも開いていない位置の行は category_code /
/// category_name / all_category_codes を持たない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Medicine {
    /// シート名 + 行番号（シート内で一意）
    pub id: String,
    /// 薬品名
    pub name: String,
    /// 元シート名
    pub sheet: String,

    /// 直近の分類コード
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,

    /// 直近の分類名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,

    /// ルートから直近の分類までのコード列
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_category_codes: Option<Vec<String>>,

    /// 剤型
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,

    /// 支払基準（非空セルのみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_standard: Option<Vec<String>>,

    /// 備考（複数列の場合は「；」連結）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// 協議有効期間
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_period: Option<String>,
}

/// シート単位の最終出力
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    /// ルート分類のみを含むネスト済みツリー
    pub categories: BTreeMap<String, Category>,
    /// 行順を保った薬品リスト
    pub medicines: Vec<Medicine>,
}
