use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sku-validator")]
#[command(about = "AI出力の商品リストをマスタカタログと照合し、SKUを検証するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 入力ファイルをマスタと照合して結果を出力
    Validate {
        /// 入力ファイル（xlsx/xls/ods/csv）
        #[arg(required = true)]
        input: PathBuf,

        /// マスタ（ファイルパスまたはURL、省略時は設定値）
        #[arg(short, long)]
        master: Option<String>,

        /// 出力ファイル/ディレクトリ（デフォルト: 入力と同じフォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (xlsx/csv/json)、省略時は出力ファイルの拡張子から判定
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// ダウンロード済みのマスタを使用（再取得しない）
        #[arg(long)]
        cached: bool,

        /// 並列で照合
        #[arg(short, long)]
        parallel: bool,

        /// 全体のタイムアウト（秒）
        #[arg(long)]
        timeout: Option<u64>,

        /// HIGH判定の閾値
        #[arg(long)]
        high_threshold: Option<u8>,

        /// PERFECT判定の閾値
        #[arg(long)]
        perfect_threshold: Option<u8>,

        /// 記号を区切りとして扱う（例: "#01" → "01"）
        #[arg(long)]
        strip_punctuation: bool,
    },

    /// マスタを読み込んで内容を確認
    Catalog {
        /// マスタ（ファイルパスまたはURL、省略時は設定値）
        #[arg(short, long)]
        master: Option<String>,

        /// ダウンロード済みのマスタを使用（再取得しない）
        #[arg(long)]
        cached: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 既定のマスタを設定
        #[arg(long)]
        set_master: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// マスタキャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}
