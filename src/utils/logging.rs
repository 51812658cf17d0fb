//! 日志工具模块
//!
//! 提供日志初始化、运行日志文件和统计输出的辅助函数

use anyhow::Result;
use std::fs;
use std::io::Write;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::{BatchAbort, BatchSummary};

/// 初始化 tracing
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 `debug` 或 `info`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n课程批量创建日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🎓 课程批量创建工具");
    info!("🌐 服务地址: {}", config.api_base_url);
    info!("📁 文档目录: {} (*.{})", config.input_folder, config.document_extension);
    info!("{}", "=".repeat(60));
    if !config.has_credentials() {
        warn!("⚠️ 未配置登录账号，请设置 PENSEUM_EMAIL / PENSEUM_PASSWORD");
    }
}

/// 渲染统计信息（日志和日志文件共用）
pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    let mut lines = vec![
        "📊 处理完成统计".to_string(),
        format!(
            "完成时间: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!("✅ 成功: {}", summary.successful()),
        format!("❌ 失败: {}", summary.failed()),
        format!("📁 总计: {}", summary.total),
    ];

    match &summary.aborted {
        Some(BatchAbort::NoDocuments) => lines.push("⚠️ 没有待处理的文档".to_string()),
        Some(BatchAbort::AuthFailed(e)) => lines.push(format!("⚠️ 批处理未开始: {}", e)),
        None => {}
    }

    if summary.interrupted {
        lines.push(format!(
            "⏹️ 已被用户中断，未处理 {} 个",
            summary.total - summary.attempted()
        ));
    }

    for report in &summary.items {
        if let Some(failure) = report.outcome.failure() {
            lines.push(format!(
                "   - {} [{}]: {}",
                report.document,
                failure.stage(),
                failure
            ));
        }
    }

    lines
}

/// 打印最终统计信息，并追加到日志文件
pub fn print_final_stats(summary: &BatchSummary, log_file_path: &str) {
    let lines = format_summary(summary);

    info!("\n{}", "=".repeat(60));
    for line in &lines {
        info!("{}", line);
    }
    info!("{}", "=".repeat(60));

    if let Err(e) = append_to_log_file(log_file_path, &lines) {
        warn!("无法写入日志文件 {}: {}", log_file_path, e);
    } else {
        info!("\n日志已保存至: {}", log_file_path);
    }
}

fn append_to_log_file(log_file_path: &str, lines: &[String]) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    writeln!(file)?;
    Ok(())
}
