use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

use little_learners::models::{GameMode, Subject};
use little_learners::{logger, App, Config, StartOptions};

/// 小小学习家：数学、英语、科学三选一答题
#[derive(Parser, Debug)]
#[command(name = "little-learners", version, about)]
struct Args {
    /// TOML 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 直接进入的科目 (MATH / ENGLISH / SCIENCE)
    #[arg(short, long)]
    subject: Option<String>,

    /// 直接进入的模式 (CLASSIC / STORY)
    #[arg(short, long)]
    mode: Option<String>,

    /// 随机种子，用于复现出题
    #[arg(long)]
    seed: Option<u64>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // 加载配置
    let config = Config::load(args.config.as_deref()).context("加载配置失败")?;

    // 初始化日志
    logger::init(args.verbose || config.verbose_logging);

    let subject = args.subject.as_deref().and_then(|s| {
        let found = Subject::find(s);
        if found.is_none() {
            warn!("⚠️ 未知科目: {}", s);
        }
        found
    });
    let mode = args.mode.as_deref().and_then(|m| {
        let found = GameMode::from_str(m);
        if found.is_none() {
            warn!("⚠️ 未知模式: {}", m);
        }
        found
    });

    // 初始化并运行应用
    let mut app = App::initialize(config, args.seed);
    app.run(StartOptions { subject, mode }).await?;

    Ok(())
}
