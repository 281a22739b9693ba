//! HTTP 层错误
//!
//! 管线错误在这里统一记录日志并转换为 500 响应，不向客户端暴露细节。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fir_core::FirError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("请求处理失败: {0}")]
    Pipeline(#[from] FirError),

    #[error("请求任务异常: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            ServerError::Pipeline(err) if err.is_configuration_defect() => {
                tracing::error!("[Fir] 配置缺陷: {}", self);
            }
            _ => tracing::error!("[Fir] {}", self),
        }
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
