//! 日志初始化

use tracing::Level;

/// 解析日志级别，无法识别时使用 info
pub fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

/// 初始化全局日志订阅器，重复调用时保留第一次的设置
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .try_init();
}
