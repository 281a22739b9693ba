//! 安全中间件
//!
//! 为页面路由加上请求体大小限制和请求超时

use axum::Router;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// 安全中间件配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityMiddlewareConfig {
    /// 最大请求体大小（字节），默认 1MB
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// 请求超时（秒），默认 30 秒
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SecurityMiddlewareConfig {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SecurityMiddlewareConfig {
    /// 获取请求超时 Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 应用到路由
    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .layer(RequestBodyLimitLayer::new(self.max_body_size))
            .layer(TimeoutLayer::new(self.request_timeout()))
    }
}
