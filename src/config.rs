//! 应用配置
//!
//! 从 YAML 文件加载，缺失的字段使用默认值，文件不存在时整体使用默认配置。
//! 站点设置（标题、语言、时区）保存在数据库中，不在这里。

use fir_server::SecurityMiddlewareConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置文件路径的环境变量
pub const CONFIG_ENV: &str = "FIR_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败 {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("解析配置文件失败 {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub views: ViewsConfig,
    #[serde(default)]
    pub languages: LanguagesConfig,
    #[serde(default)]
    pub security: SecurityMiddlewareConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 监听配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("fir"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fir.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// 模板目录配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewsConfig {
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
        }
    }
}

/// 语言包配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagesConfig {
    /// 语言包目录
    #[serde(default = "default_languages_dir")]
    pub dir: PathBuf,
    /// 回退语言
    #[serde(default = "default_language")]
    pub default: String,
}

fn default_languages_dir() -> PathBuf {
    PathBuf::from("languages")
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            dir: default_languages_dir(),
            default: default_language(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace / debug / info / warn / error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 加载配置，文件不存在时返回默认配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// 配置文件路径：`FIR_CONFIG` 环境变量，否则为当前目录下的 `config.yaml`
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
