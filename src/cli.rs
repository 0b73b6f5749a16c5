use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "commodity-scraper")]
#[command(about = "市況レポートの品目別テーブル収集ツール（中断からの再開対応）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// チェックポイント・完了台帳の置き場所
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 全品目を収集（チェックポイントがあれば続きから）
    Run {
        /// CSV出力ディレクトリ（デフォルト: data/raw）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ブラウザを表示して実行
        #[arg(long)]
        headful: bool,

        /// 品目選択後の待機時間（ミリ秒）
        #[arg(long)]
        settle_ms: Option<u64>,

        /// 要素待ちの上限（ミリ秒）
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// チェックポイントと完了台帳の内容を表示
    Status {
        /// 品目ごとの取得済み種別も表示
        #[arg(long)]
        detail: bool,
    },

    /// 進捗ファイルを削除
    Reset {
        /// チェックポイントを削除
        #[arg(long)]
        checkpoint: bool,

        /// 完了台帳を削除（次回は全品目を取り直す）
        #[arg(long)]
        ledger: bool,
    },

    /// 設定を表示
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
