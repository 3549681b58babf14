//! 医保薬品目録Excel→JSON変換ツール
//!
//! 抽出・ツリー構築のコアは yao-catalog-common 側にあり、
//! このクレートはCLI・設定・Excel読み込み・出力のドライバ。

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod reader;
