use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yao-catalog")]
#[command(about = "医保薬品目録Excel→JSON変換ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ExcelワークブックをシートごとのJSONに変換
    Convert {
        /// 入力Excelファイルまたはフォルダ
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ディレクトリ（省略時は設定の出力先）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 対象シート名（省略時は全シート、複数指定可）
        #[arg(short, long)]
        sheet: Vec<String>,

        /// 列マッピング定義JSONファイル
        #[arg(long)]
        col_map: Option<PathBuf>,

        /// シートを並列に変換
        #[arg(short, long)]
        parallel: bool,

        /// 変換するシートを対話的に選択
        #[arg(short, long)]
        interactive: bool,

        /// 整形なしの1行JSONで出力
        #[arg(long)]
        compact: bool,
    },

    /// ワークブックのシート一覧を表示
    Sheets {
        /// 入力Excelファイル
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 変換結果の統計を表示（ファイル出力なし）
    Stats {
        /// 入力Excelファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 対象シート名（省略時は全シート、複数指定可）
        #[arg(short, long)]
        sheet: Vec<String>,

        /// 列マッピング定義JSONファイル
        #[arg(long)]
        col_map: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 出力ディレクトリを設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// 列マッピング定義JSONのパスを設定
        #[arg(long)]
        set_col_map: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
