//! Fir 站点
//!
//! 组装配置、日志、数据库、语言包、模板和页面，启动 HTTP 服务。

pub mod app;
pub mod config;
pub mod logger;
pub mod pages;

pub use config::AppConfig;
