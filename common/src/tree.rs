//! 分類ツリーの組み立てと薬品数の集計
//!
//! フラットな registry（各分類は親コードしか知らない）を
//! ルートだけを含むネスト済みツリーに変換し、medicine_count を
//! 子孫込みの累計に置き換える。

use crate::error::{Error, Result};
use crate::types::Category;
use std::collections::BTreeMap;

/// フラットな分類 registry をネスト済みツリーに組み立てる
///
/// 親が registry に存在しない分類はルート扱い。各ノードは
/// コピーされて親のマップにぶら下がるため、入力は変更されない。
/// 親リンクが循環していてどこにも配置できない分類があればエラー。
pub fn build_category_tree(
    categories: &BTreeMap<String, Category>,
) -> Result<BTreeMap<String, Category>> {
    // 親コード→子、およびルートへの振り分け
    let mut children: BTreeMap<&str, Vec<&Category>> = BTreeMap::new();
    let mut roots: Vec<&Category> = Vec::new();

    for category in categories.values() {
        match category
            .parent_code
            .as_deref()
            .filter(|parent| categories.contains_key(*parent))
        {
            Some(parent) => children.entry(parent).or_default().push(category),
            None => roots.push(category),
        }
    }

    let mut tree = BTreeMap::new();
    let mut placed = 0usize;
    for root in roots {
        tree.insert(
            root.code.clone(),
            attach_subcategories(root, &children, &mut placed),
        );
    }

    // 各ノードの親は高々1つなので、ルートから辿れない分類は
    // 親リンクの循環にしか現れない
    if placed != categories.len() {
        return Err(Error::Tree(format!(
            "親リンクが循環しています（{}分類中{}分類のみ配置）",
            categories.len(),
            placed
        )));
    }

    Ok(tree)
}

/// 分類をコピーし、子孫を再帰的にぶら下げる
fn attach_subcategories(
    category: &Category,
    children: &BTreeMap<&str, Vec<&Category>>,
    placed: &mut usize,
) -> Category {
    *placed += 1;
    let mut node = category.clone();
    node.subcategories = BTreeMap::new();
    if let Some(subs) = children.get(category.code.as_str()) {
        for sub in subs {
            node.subcategories.insert(
                sub.code.clone(),
                attach_subcategories(sub, children, placed),
            );
        }
    }
    node
}

/// medicine_count を子孫込みの累計に更新する（帰りがけ順）
///
/// 葉は直下数のまま変更しない。戻り値はそのノードの累計。
pub fn update_medicine_count(node: &mut Category) -> u32 {
    let direct = node.medicine_count;
    if node.subcategories.is_empty() {
        return direct;
    }
    let descendants: u32 = node
        .subcategories
        .values_mut()
        .map(update_medicine_count)
        .sum();
    node.medicine_count = direct + descendants;
    node.medicine_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(code: &str, parent: Option<&str>, level: u32, count: u32) -> Category {
        Category {
            code: code.to_string(),
            name: format!("{}の名称", code),
            level,
            parent_code: parent.map(|p| p.to_string()),
            subcategories: BTreeMap::new(),
            medicine_count: count,
        }
    }

    fn registry(entries: Vec<Category>) -> BTreeMap<String, Category> {
        entries
            .into_iter()
            .map(|cat| (cat.code.clone(), cat))
            .collect()
    }

    #[test]
    fn test_nests_under_parents() {
        let flat = registry(vec![
            category("a", None, 1, 0),
            category("bb", Some("a"), 2, 0),
            category("ccc", Some("bb"), 3, 0),
            category("d", None, 1, 0),
        ]);

        let tree = build_category_tree(&flat).expect("組み立て失敗");
        assert_eq!(tree.len(), 2);
        let a = &tree["a"];
        assert_eq!(a.subcategories.len(), 1);
        let bb = &a.subcategories["bb"];
        assert_eq!(bb.subcategories.len(), 1);
        assert!(bb.subcategories.contains_key("ccc"));
        assert!(tree["d"].subcategories.is_empty());
    }

    #[test]
    fn test_missing_parent_becomes_root() {
        let flat = registry(vec![category("bb", Some("消えた親"), 2, 3)]);

        let tree = build_category_tree(&flat).expect("組み立て失敗");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree["bb"].medicine_count, 3);
    }

    #[test]
    fn test_cumulative_counts() {
        let flat = registry(vec![
            category("a", None, 1, 2),
            category("bb", Some("a"), 2, 3),
            category("cc", Some("a"), 2, 0),
            category("ddd", Some("cc"), 3, 5),
        ]);

        let mut tree = build_category_tree(&flat).expect("組み立て失敗");
        for root in tree.values_mut() {
            update_medicine_count(root);
        }

        let a = &tree["a"];
        assert_eq!(a.medicine_count, 10); // 2 + 3 + 0 + 5
        assert_eq!(a.subcategories["bb"].medicine_count, 3); // 葉はそのまま
        assert_eq!(a.subcategories["cc"].medicine_count, 5); // 0 + 5
        assert_eq!(a.subcategories["cc"].subcategories["ddd"].medicine_count, 5);
    }

    #[test]
    fn test_count_returns_cumulative_value() {
        let flat = registry(vec![
            category("a", None, 1, 1),
            category("bb", Some("a"), 2, 4),
        ]);
        let mut tree = build_category_tree(&flat).expect("組み立て失敗");
        let root = tree.get_mut("a").expect("ルートがない");
        assert_eq!(update_medicine_count(root), 5);
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let flat = registry(vec![
            category("a", None, 1, 2),
            category("bb", Some("a"), 2, 3),
        ]);

        let first = build_category_tree(&flat).expect("1回目失敗");
        let second = build_category_tree(&flat).expect("2回目失敗");
        assert_eq!(first, second);
        // 入力のregistryも変化していない
        assert!(flat["a"].subcategories.is_empty());
        assert_eq!(flat["a"].medicine_count, 2);
    }

    #[test]
    fn test_every_category_placed_exactly_once() {
        let flat = registry(vec![
            category("a", None, 1, 0),
            category("bb", Some("a"), 2, 0),
            category("cc", Some("a"), 2, 0),
            category("ddd", Some("cc"), 3, 0),
            category("e", None, 1, 0),
        ]);

        let tree = build_category_tree(&flat).expect("組み立て失敗");

        fn collect_codes(node: &Category, out: &mut Vec<String>) {
            out.push(node.code.clone());
            for sub in node.subcategories.values() {
                collect_codes(sub, out);
            }
        }
        let mut codes = Vec::new();
        for root in tree.values() {
            collect_codes(root, &mut codes);
        }
        codes.sort();
        let mut expected: Vec<String> = flat.keys().cloned().collect();
        expected.sort();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_cyclic_parent_links_are_an_error() {
        let flat = registry(vec![
            category("a", Some("bb"), 1, 0),
            category("bb", Some("a"), 2, 0),
        ]);

        let result = build_category_tree(&flat);
        assert!(matches!(result, Err(Error::Tree(_))));
    }

    #[test]
    fn test_self_parent_is_an_error() {
        let flat = registry(vec![category("a", Some("a"), 1, 0)]);
        assert!(matches!(build_category_tree(&flat), Err(Error::Tree(_))));
    }
}
