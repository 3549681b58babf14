use clap::Parser;
use std::path::Path;
use yao_catalog_rust::{cli, config, convert, error, reader};

use cli::{Cli, Commands};
use config::Config;
use error::{Result, YaoCatalogError};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            sheet,
            col_map,
            parallel,
            interactive,
            compact,
        } => {
            println!("💊 yao-catalog - 医保薬品目録変換\n");

            let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
            let col_map_path = col_map.or_else(|| config.column_map.clone());
            let columns = convert::load_column_map(col_map_path.as_deref())?;

            // 1. ワークブック検索
            println!("[1/3] ワークブックを検索中...");
            let workbooks = if input.is_dir() {
                reader::find_workbooks(&input)?
            } else {
                vec![input.clone()]
            };
            println!("✔ {}件のワークブックを検出\n", workbooks.len());

            let mut failed = 0usize;
            for workbook_path in &workbooks {
                failed += convert_workbook(
                    workbook_path,
                    &sheet,
                    interactive,
                    parallel,
                    compact,
                    &columns,
                    &output_dir,
                    cli.verbose,
                )?;
            }

            if failed > 0 {
                println!("\n⚠ {}シートの変換に失敗しました", failed);
                std::process::exit(1);
            }
            println!("\n✅ 変換完了");
        }

        Commands::Sheets { input } => {
            println!("📋 シート一覧: {}\n", input.display());

            let mut workbook = reader::Workbook::open(&input)?;
            for sheet_name in workbook.sheet_names() {
                let rows = workbook.sheet_rows(&sheet_name)?;
                println!("  {} ({}行)", sheet_name, rows.len());
            }
        }

        Commands::Stats {
            input,
            sheet,
            col_map,
        } => {
            println!("📊 yao-catalog - 統計\n");

            let col_map_path = col_map.or_else(|| config.column_map.clone());
            let columns = convert::load_column_map(col_map_path.as_deref())?;

            let mut workbook = reader::Workbook::open(&input)?;
            let all_sheets = workbook.sheet_names();
            let targets = resolve_targets(&all_sheets, &sheet)?;

            for sheet_name in targets {
                let rows = workbook.sheet_rows(&sheet_name)?;
                match convert::convert_sheet(&rows, &sheet_name, &columns) {
                    Ok(data) => {
                        println!("{}:", sheet_name);
                        println!("  薬品数: {}", data.medicines.len());
                        println!("  分類ツリー:");
                        for root in data.categories.values() {
                            println!(
                                "    {} {} ({}件)",
                                root.code, root.name, root.medicine_count
                            );
                        }
                        println!();
                    }
                    Err(e) => println!("✗ {}: {}\n", sheet_name, e),
                }
            }
        }

        Commands::Config {
            set_output_dir,
            set_col_map,
            show,
        } => {
            let mut config = config;

            if let Some(dir) = set_output_dir {
                config.set_output_dir(dir)?;
                println!("✔ 出力ディレクトリを設定しました");
            }

            if let Some(path) = set_col_map {
                config.set_column_map(path)?;
                println!("✔ 列マッピングのパスを設定しました");
            }

            if show {
                println!("設定:");
                println!("  出力ディレクトリ: {}", config.output_dir.display());
                println!(
                    "  列マッピング: {}",
                    config
                        .column_map
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "（組み込み表）".to_string())
                );
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

/// 1ワークブックを変換し、失敗したシート数を返す
#[allow(clippy::too_many_arguments)]
fn convert_workbook(
    workbook_path: &Path,
    sheet_filter: &[String],
    interactive: bool,
    parallel: bool,
    compact: bool,
    columns: &yao_catalog_common::ColumnMap,
    output_dir: &Path,
    verbose: bool,
) -> Result<usize> {
    println!("📖 {}", workbook_path.display());
    let mut workbook = reader::Workbook::open(workbook_path)?;

    // 2. シート選択と読み込み
    let all_sheets = workbook.sheet_names();
    let mut targets = resolve_targets(&all_sheets, sheet_filter)?;
    if interactive {
        targets = convert::select_sheets_interactive(&targets)?;
    }
    if targets.is_empty() {
        println!("変換対象のシートがありません\n");
        return Ok(0);
    }

    println!("[2/3] シートを読み込み中...");
    let mut sheets: Vec<(String, Vec<Vec<String>>)> = Vec::new();
    for sheet_name in &targets {
        let rows = workbook.sheet_rows(sheet_name)?;
        if verbose {
            println!("  {}: {}行", sheet_name, rows.len());
        }
        sheets.push((sheet_name.clone(), rows));
    }
    println!("✔ {}シート\n", sheets.len());

    // 3. 変換・書き出し
    println!("[3/3] 変換中...");
    let results = if parallel {
        convert::convert_sheets_parallel(&sheets, columns, output_dir, compact)
    } else {
        sheets
            .iter()
            .map(|(sheet_name, rows)| {
                println!("処理 {}...", sheet_name);
                (
                    sheet_name.clone(),
                    convert::convert_and_write(rows, sheet_name, columns, output_dir, compact),
                )
            })
            .collect()
    };

    let mut failed = 0usize;
    for (sheet_name, result) in results {
        match result {
            Ok(summary) => print_summary(&summary),
            Err(e) => {
                // 失敗したシートは報告して続行（他のシートには影響しない）
                println!("✗ {}: {}", sheet_name, e);
                failed += 1;
            }
        }
    }
    println!();

    Ok(failed)
}

/// シート指定を実在するシートに解決する
fn resolve_targets(all_sheets: &[String], filter: &[String]) -> Result<Vec<String>> {
    if filter.is_empty() {
        return Ok(all_sheets.to_vec());
    }
    for name in filter {
        if !all_sheets.contains(name) {
            return Err(YaoCatalogError::SheetNotFound(name.clone()));
        }
    }
    Ok(filter.to_vec())
}

/// シートの変換結果を表示する
fn print_summary(summary: &convert::SheetSummary) {
    if let Some(path) = &summary.output_path {
        println!("✔ 保存: {}", path.display());
    }
    println!("  - 薬品数: {}", summary.medicine_count);
    println!("  - 分類数: {}", summary.category_count);
    if let Some((name, codes)) = &summary.sample {
        println!("  - サンプル: {} [{}]", name, codes.join(" > "));
    }
}
