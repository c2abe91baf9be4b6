/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::subject::{GameMode, Subject};

/// 记录程序启动信息
pub fn log_startup(config: &Config, total_score: u64) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🤖 Story 模型: {}", config.llm_model_name);
    if config.has_llm_credentials() {
        info!("🔑 已配置 API Key");
    } else {
        info!("🔑 未配置 API Key，Story 模式将使用 Classic 题目");
    }
    info!("🏆 累计总分: {}", total_score);
    info!("{}", "=".repeat(60));
}

/// 记录开始一局
pub fn log_game_start(subject: Subject, mode: GameMode) {
    info!("\n{}", "─".repeat(60));
    info!("📚 开始游戏: {} / {}", subject.display_name(), mode.display_name());
    info!("{}", "─".repeat(60));
}

/// 打印一局的统计信息
///
/// # 参数
/// - `score`: 本局得分
/// - `best_streak`: 本局最长连对
/// - `total_score`: 累计总分
pub fn print_game_stats(score: u64, best_streak: u64, total_score: u64) {
    info!("\n{}", "=".repeat(60));
    info!("📊 本局统计");
    info!("✅ 得分: {}", score);
    info!("🔥 最长连对: {}", best_streak);
    info!("🏆 累计总分: {}", total_score);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
