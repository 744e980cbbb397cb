use clap::Parser;
use consistency_ai::analyzer::{BatchEngine, EngineOptions, GatewayClient, ItemPayload, ItemStore};
use consistency_ai::cli::{Cli, Commands};
use consistency_ai::config::Config;
use consistency_ai::error::{ConsistencyError, Result};
use consistency_ai::{export, importer, progress};
use dialoguer::Confirm;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Run {
            input,
            mode,
            output,
            fail_fast,
            delay,
            cooldown,
            max_retries,
            no_prompt,
        } => {
            println!("🔍 consistency-ai - 批量核验\n");

            // 1. 读取Excel
            println!("[1/3] 读取Excel中...");
            let items = importer::import_work_items(&input, mode)?;
            println!("✔ 读取到{}条待核验数据\n", items.len());

            let mut options = EngineOptions::from_config(&config, fail_fast);
            if let Some(secs) = delay {
                options.normal_delay = Duration::from_secs(secs);
            }
            if let Some(secs) = cooldown {
                options.error_cooldown = Duration::from_secs(secs);
            }
            if let Some(n) = max_retries {
                options.max_retries = n;
            }

            // 凭证缺失在此一次性报错，不会逐条失败
            let client = GatewayClient::new(&config)?.with_verbose(cli.verbose);

            let store = ItemStore::new(items);
            let (events_tx, events_rx) = mpsc::unbounded_channel();
            let engine = BatchEngine::new(store.clone(), client, options).with_events(events_tx);
            let progress_handle = progress::spawn(store.counts(), events_rx);

            // 2. 核验（Ctrl+C暂停，可继续或导出当前进度）
            println!(
                "[2/3] AI核验中...{}（Ctrl+C可暂停）",
                if fail_fast { "（快速失败模式）" } else { "" }
            );
            let summary = loop {
                let cancel = CancellationToken::new();
                let watcher = tokio::spawn({
                    let cancel = cancel.clone();
                    async move {
                        if tokio::signal::ctrl_c().await.is_ok() {
                            cancel.cancel();
                        }
                    }
                });

                let summary = engine.run(&cancel).await;
                watcher.abort();

                if !summary.stopped {
                    break summary;
                }

                println!(
                    "\n⏸ 已暂停（完成 {}/{}）",
                    summary.success + summary.error,
                    summary.total
                );
                if no_prompt {
                    break summary;
                }

                let resume = Confirm::new()
                    .with_prompt("继续核验剩余数据?")
                    .default(true)
                    .interact()
                    .map_err(|e| ConsistencyError::Config(format!("交互失败: {}", e)))?;
                if !resume {
                    break summary;
                }
                println!("▶ 继续核验...\n");
            };

            drop(engine);
            let _ = progress_handle.await;

            // 3. 导出（完成或部分均可）
            println!("\n[3/3] 导出结果中...");
            let output_dir = output.unwrap_or_else(|| {
                input
                    .parent()
                    .map(PathBuf::from)
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| PathBuf::from("."))
            });
            std::fs::create_dir_all(&output_dir)?;

            let snapshot = store.snapshot();
            let path = export::export_results(&snapshot, mode, &output_dir)?;
            println!("✔ 结果已导出: {}", path.display());

            println!(
                "\n✅ 完成: 成功{} 失败{} 未处理{}",
                summary.success, summary.error, summary.pending
            );
        }

        Commands::Check {
            mode,
            real,
            recommended,
            spu,
            recommend,
            merchant,
        } => {
            use consistency_ai::analyzer::{AnalysisMode, ConsistencyClient};

            let payload = match mode {
                AnalysisMode::Address => ItemPayload::Address {
                    poi_id: "-".into(),
                    merchant_name: merchant.unwrap_or_else(|| "-".into()),
                    real_address: real.ok_or_else(|| {
                        ConsistencyError::Config("address模式需要 --real".into())
                    })?,
                    recommended_address: recommended.ok_or_else(|| {
                        ConsistencyError::Config("address模式需要 --recommended".into())
                    })?,
                },
                AnalysisMode::Dish => ItemPayload::Dish {
                    spu_id: "-".into(),
                    merchant_name: merchant.ok_or_else(|| {
                        ConsistencyError::Config("dish模式需要 --merchant".into())
                    })?,
                    spu_name: spu
                        .ok_or_else(|| ConsistencyError::Config("dish模式需要 --spu".into()))?,
                    recommend_dish_name: recommend.ok_or_else(|| {
                        ConsistencyError::Config("dish模式需要 --recommend".into())
                    })?,
                },
            };

            let client = GatewayClient::new(&config)?.with_verbose(cli.verbose);
            println!("🔍 核验中...");
            let verdict = client.classify(&payload).await?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }

        Commands::Config {
            set_app_id,
            set_model,
            set_endpoint,
            show,
        } => {
            let mut config = config;

            if let Some(app_id) = set_app_id {
                config.set_app_id(app_id)?;
                println!("✔ App ID已设置");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ 模型已设置");
            }

            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                println!("✔ 网关地址已设置");
            }

            if show {
                println!("配置:");
                println!("  网关地址: {}", config.api_endpoint);
                println!("  模型: {}", config.model);
                println!("  请求间隔: {}秒", config.normal_delay_secs);
                println!("  失败冷却: {}秒", config.error_cooldown_secs);
                println!("  最大重试: {}次", config.max_retries);
                println!("  超时: {}秒", config.timeout_seconds);
                println!(
                    "  App ID: {}",
                    if config.app_id.is_some() || std::env::var("APP_ID").is_ok() {
                        "已设置"
                    } else {
                        "未设置"
                    }
                );
            }
        }
    }

    Ok(())
}
