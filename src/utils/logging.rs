/// 日志工具模块
///
/// 提供日志初始化与格式化输出的辅助函数
use crate::config::Config;
use crate::orchestrator::BatchStats;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则为 `info`（详细模式为 `debug`）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 仓库评分检查");
    info!("📚 课程: {}", config.course_id);
    info!(
        "📝 作业: {} (备用: {})",
        config.primary_assignment_id,
        if config.fallback_assignment_id.is_empty() {
            "无"
        } else {
            config.fallback_assignment_id.as_str()
        }
    );
    info!("⏱️ 每个学生间隔: {} ms", config.request_delay_ms);
    info!("{}", "=".repeat(60));
}

/// 记录花名册加载信息
///
/// # 参数
/// - `total`: 学生总数
/// - `with_handle`: 提取到用户名的学生数
pub fn log_roster_loaded(total: usize, with_handle: usize) {
    info!("✓ 花名册共 {} 名学生", total);
    info!("🔗 其中 {} 名提取到用户名，将逐个检查\n", with_handle);
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 统计
/// - `output_file`: 结果表路径
pub fn print_final_stats(stats: &BatchStats, output_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已检查: {}/{}", stats.checked, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("⏭️ 跳过（无用户名）: {}", stats.skipped);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_file);
}

/// 按字符数截断日志里的长文本，超出部分以 `...` 结尾
pub fn truncate_text(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("仓库评分检查", 2), "仓库...");
        assert_eq!(truncate_text("仓库", 2), "仓库");
        assert_eq!(truncate_text("", 0), "");
    }
}
