//! 页面注册表
//!
//! 首个路由段选择页面；空路径进入首页，未注册的名称进入 404 页面。

use axum::http::StatusCode;
use fir_core::Page;
use std::collections::HashMap;
use std::sync::Arc;

pub const HOME_PAGE: &str = "home";

pub struct PageRegistry {
    pages: HashMap<String, Arc<dyn Page>>,
    not_found: Arc<dyn Page>,
}

impl PageRegistry {
    pub fn new(not_found: Arc<dyn Page>) -> Self {
        Self {
            pages: HashMap::new(),
            not_found,
        }
    }

    pub fn register(&mut self, name: impl Into<String>, page: Arc<dyn Page>) -> &mut Self {
        self.pages.insert(name.into(), page);
        self
    }

    /// 按路由段选择页面
    pub fn resolve(&self, path: &[String]) -> (Arc<dyn Page>, StatusCode) {
        let name = path.first().map(String::as_str).unwrap_or(HOME_PAGE);
        match self.pages.get(name) {
            Some(page) => (Arc::clone(page), StatusCode::OK),
            None => (Arc::clone(&self.not_found), StatusCode::NOT_FOUND),
        }
    }
}

/// 空路径补全为首页
pub fn route_path(segments: Vec<String>) -> Vec<String> {
    if segments.is_empty() {
        vec![HOME_PAGE.to_string()]
    } else {
        segments
    }
}
