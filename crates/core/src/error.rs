//! 核心错误类型
//!
//! 请求管线中所有失败都以 `FirError` 的形式向上传播，
//! 由宿主（HTTP 层）决定如何记录和响应。

use thiserror::Error;

/// 请求管线错误
#[derive(Error, Debug)]
pub enum FirError {
    /// 未注册的模型名称（配置缺陷）
    #[error("模型不存在: {0}")]
    ModelNotFound(String),

    /// 模型类型与调用方期望不符
    #[error("模型类型不匹配: {0}")]
    ModelTypeMismatch(String),

    /// 模板文件缺失（部署缺陷）
    #[error("模板不存在: {0}")]
    TemplateNotFound(String),

    /// 模板渲染失败
    #[error("模板渲染失败 [{template}]: {reason}")]
    Render { template: String, reason: String },

    /// 语言包加载失败
    #[error("语言包加载失败: {0}")]
    Language(String),

    /// 数据库锁被污染
    #[error("数据库锁定失败: {0}")]
    DatabaseLock(String),

    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl FirError {
    /// 是否为配置/部署缺陷（未知模型、缺失模板）
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            FirError::ModelNotFound(_)
                | FirError::ModelTypeMismatch(_)
                | FirError::TemplateNotFound(_)
        )
    }
}

pub type FirResult<T> = Result<T, FirError>;
