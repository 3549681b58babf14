//! 出力契約の検証
//!
//! ドライバがシート出力を受け入れる前の必須チェック。
//! 分類が一つも開いていない位置の薬品行は all_category_codes を
//! 持たないため、ここでシート単位の構造エラーになる。

use crate::error::{Error, Result};
use crate::types::Medicine;

/// 全薬品が all_category_codes を持つことを検証する
///
/// 最初に見つかった違反で、シート名と行位置を添えて打ち切る。
pub fn verify_medicines(sheet_name: &str, medicines: &[Medicine]) -> Result<()> {
    for (index, medicine) in medicines.iter().enumerate() {
        if medicine.all_category_codes.is_none() {
            return Err(Error::MissingCategoryCodes {
                sheet: sheet_name.to_string(),
                index,
                name: medicine.name.clone(),
            });
        }
    }
    Ok(())
}
