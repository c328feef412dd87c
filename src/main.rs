use clap::Parser;
use sku_validator::{cli, config, error, export, master, reader, runner};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use export::{ExportFormat, ExportMeta};
use master::{LoadOptions, MasterCache, MasterSource};
use sku_validator_common::{InputColumns, MatchStatus, RunSummary};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(config: &Config, cached: bool) -> LoadOptions {
    LoadOptions {
        timeout: Duration::from_secs(config.timeout_seconds),
        use_cache: cached,
        cache_dir: MasterCache::default_dir().ok(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    // Ctrl-C はコマンド全体で監視する（照合中のみキャンセル扱い）
    let interrupt = runner::Interrupt::new();
    let _signal = interrupt.install();

    match cli.command {
        Commands::Validate {
            input,
            master,
            output,
            format,
            cached,
            parallel,
            timeout,
            high_threshold,
            perfect_threshold,
            strip_punctuation,
        } => {
            println!("🔎 sku-validator - SKU検証\n");

            let mut options = config.validation.clone();
            if let Some(value) = high_threshold {
                options.high_threshold = value;
            }
            if let Some(value) = perfect_threshold {
                options.perfect_threshold = value;
            }
            options.strip_punctuation |= strip_punctuation;
            options.validate()?;

            // 1. マスタ読み込み
            let source = MasterSource::parse(&config.master_source(master.as_deref())?);
            println!("[1/4] マスタを読み込み中... ({})", source);
            let loaded = master::load_master_table(&source, &load_options(&config, cached)).await?;
            let catalog = master::build_catalog(&loaded.table, &options)?;
            println!("✔ マスタ {}件 ({})\n", catalog.len(), loaded.origin);
            if catalog.is_empty() {
                println!("⚠ マスタが空です。全件 NOT_FOUND になります\n");
            }

            // 2. 入力読み込み
            println!("[2/4] 入力ファイルを読み込み中...");
            let table = reader::read_table(&input)?;
            let columns = InputColumns::resolve(&table, &options);
            if columns.name.is_none() {
                println!("⚠ 商品名列が見つかりません（候補: {}）", options.name_columns.join(", "));
            }
            if columns.sku.is_none() {
                println!("⚠ SKU列 '{}' が見つかりません", options.sku_column);
            }
            let records = table.input_records(&options);
            println!("✔ {}件を検出\n", records.len());

            // 3. 照合
            let run_parallel = parallel || config.parallel;
            println!("[3/4] 照合中...{}", if run_parallel { " (並列)" } else { "" });
            let catalog_size = catalog.len();
            let run = runner::RunOptions {
                parallel: run_parallel,
                timeout: timeout.map(Duration::from_secs),
                show_progress: true,
                interrupt: Some(interrupt.clone()),
            };
            let results = runner::run_reconciliation(Arc::new(catalog), records, options, run).await?;
            let summary = RunSummary::from_results(&results);
            println!("✔ 照合完了");
            for status in MatchStatus::ALL {
                println!("  {:<10} {}件", status.as_str(), summary.count_for(status));
            }
            println!(
                "  SKU: 一致 {} / 不一致 {} / 欠落 {}\n",
                summary.sku_matches, summary.sku_mismatch, summary.sku_missing
            );

            // 4. 出力
            println!("[4/4] 結果を保存中...");
            let format = format
                .or_else(|| output.as_deref().and_then(ExportFormat::from_path))
                .unwrap_or_default();
            let output_dir = output.unwrap_or_else(|| {
                input
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| std::path::PathBuf::from("."))
            });
            let output_path = export::resolve_output_path(&output_dir, format);
            let meta = ExportMeta {
                master: source.to_string(),
                input: input.display().to_string(),
                catalog_size,
            };
            export::export_results(&results, format, &output_path, &meta)?;
            println!("✔ 結果を保存: {}", output_path.display());

            println!("\n✅ 検証完了");
        }

        Commands::Catalog { master, cached } => {
            println!("📋 sku-validator - マスタ確認\n");

            let options = config.validation.clone();
            let source = MasterSource::parse(&config.master_source(master.as_deref())?);
            let loaded = master::load_master_table(&source, &load_options(&config, cached)).await?;
            let catalog = master::build_catalog(&loaded.table, &options)?;

            println!("マスタ:");
            println!("  取得元: {} ({})", source, loaded.origin);
            println!("  件数: {}", catalog.len());
            println!("  SKUなし: {}件", catalog.missing_sku_count());

            let duplicates = catalog.duplicate_names();
            if !duplicates.is_empty() {
                println!("  重複商品名: {}件（先頭の行を使用）", duplicates.len());
                for name in duplicates.iter().take(10) {
                    println!("    - {}", name);
                }
            }
        }

        Commands::Config { set_master, show } => {
            let mut config = config;

            if let Some(master) = set_master {
                config.set_master(master)?;
                println!("✔ マスタを設定しました");
            }

            if show {
                println!("設定:");
                println!("  マスタ: {}", config.master.as_deref().unwrap_or("未設定"));
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  並列照合: {}", if config.parallel { "有効" } else { "無効" });
                println!("  HIGH閾値: {}", config.validation.high_threshold);
                println!("  PERFECT閾値: {}", config.validation.perfect_threshold);
                println!("  商品名列: {}", config.validation.name_columns.join(" → "));
                println!("  SKU列: {}", config.validation.sku_column);
            }
        }

        Commands::Cache { clear, info } => {
            let cache_dir = MasterCache::default_dir()?;

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                let cache = MasterCache::open(&cache_dir);
                if cache.is_empty() {
                    println!("キャッシュはありません: {}", cache_dir.display());
                } else {
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_dir.display());
                    println!("  件数: {}", cache.len());
                    for entry in cache.entries() {
                        println!("  - {} ({} bytes, {})", entry.url, entry.size, entry.fetched_at);
                    }
                }
            }

            if clear {
                match MasterCache::clear(&cache_dir) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_dir.display()),
                    Ok(false) => println!("キャッシュは存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
