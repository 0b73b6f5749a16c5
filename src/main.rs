use anyhow::Context;
use clap::Parser;
use commodity_scraper::{cli, config, logging, runner, ChromeSession};
use commodity_scraper_common::{CheckpointStore, CompletionLedger};
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load().context("設定ファイルの読み込みに失敗")?;
    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }

    match cli.command {
        Commands::Run { output, headful, settle_ms, timeout_ms } => {
            // ブラウザ起動前に必須設定を確認
            let target_url = config.target_url()?;

            if let Some(dir) = output {
                config.output_dir = dir;
            }
            if headful {
                config.headless = false;
            }
            if let Some(ms) = settle_ms {
                config.timings.settle_ms = ms;
            }
            if let Some(ms) = timeout_ms {
                config.timings.wait_timeout_ms = ms;
            }

            println!("🧺 commodity-scraper - 収集開始\n");

            let mut session = ChromeSession::launch(&config).context("ブラウザの起動に失敗")?;

            let progress = ProgressBar::new(0);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let summary = runner::Runner::new(&mut session, &config, target_url)
                .with_progress(progress)
                .run()
                .context("収集を中断しました。再実行するとチェックポイントから再開します")?;

            println!("✔ 処理: {}件", summary.processed.len());
            println!("✔ スキップ: {}件", summary.skipped.len());
            if !summary.failed.is_empty() {
                println!("⚠ タイムアウト: {}件 ({})", summary.failed.len(), summary.failed.join(", "));
            }
            println!("✔ 出力ファイル: {}件 → {}", summary.files_written.len(), config.output_dir.display());
            println!("\n✅ 完了 (run id: {})", summary.run_id);
        }

        Commands::Status { detail } => {
            let checkpoints = CheckpointStore::new(&config.state_dir);
            if checkpoints.exists() {
                let state = checkpoints.load();
                println!("チェックポイント:");
                println!("  パス: {}", checkpoints.path().display());
                println!("  位置: {}", state.current_index);
                println!("  品目: {}", state.current_commodity.as_deref().unwrap_or("-"));
                println!("  完了: {}件", state.completed.len());
                println!("  run id: {}", state.run_id);
                println!("  更新: {}", state.timestamp);
            } else {
                println!("チェックポイントはありません（次回は先頭から）");
            }

            let ledger = CompletionLedger::load(&config.state_dir);
            println!("完了台帳: {}件", ledger.len());
            if detail {
                for (name, kinds) in ledger.iter() {
                    let kinds: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
                    println!("  {}: {}", name, kinds.join(", "));
                }
            }
        }

        Commands::Reset { checkpoint, ledger } => {
            if !checkpoint && !ledger {
                println!("--checkpoint または --ledger を指定してください");
            }
            if checkpoint {
                let store = CheckpointStore::new(&config.state_dir);
                match store.clear() {
                    Ok(true) => println!("✔ チェックポイントを削除しました: {}", store.path().display()),
                    Ok(false) => println!("チェックポイントは存在しません"),
                    Err(e) => println!("チェックポイント削除エラー: {}", e),
                }
            }
            if ledger {
                match CompletionLedger::clear(&config.state_dir) {
                    Ok(true) => println!("✔ 完了台帳を削除しました"),
                    Ok(false) => println!("完了台帳は存在しません"),
                    Err(e) => println!("完了台帳削除エラー: {}", e),
                }
            }
        }

        Commands::Config { show } => {
            if show {
                let target = config
                    .target_url()
                    .ok()
                    .and_then(|u| url::Url::parse(&u).ok())
                    .and_then(|u| u.host_str().map(str::to_string));
                println!("設定:");
                println!("  対象ホスト: {}", target.as_deref().unwrap_or("未設定"));
                println!("  ヘッドレス: {}", config.headless);
                println!("  状態ディレクトリ: {}", config.state_dir.display());
                println!("  出力ディレクトリ: {}", config.output_dir.display());
                println!("  待機上限: {}ms", config.timings.wait_timeout_ms);
                println!("  選択後待機: {}ms", config.timings.settle_ms);
            } else {
                println!("設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}
