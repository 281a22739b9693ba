//! 视图渲染契约
//!
//! 模板名是逻辑路径（如 `shared/header`、`wrapper`），
//! 解析到具体模板文件由渲染器负责。

mod template;

pub use template::{TemplateView, TemplateViewFactory};

use crate::error::FirResult;
use crate::language::Translations;
use crate::settings::Settings;

/// 模板数据
pub type ViewData = serde_json::Map<String, serde_json::Value>;

/// 视图渲染器
///
/// 构造后不可变，渲染是无副作用的纯操作。
pub trait ViewRenderer: Send + Sync {
    fn render(&self, data: &ViewData, template: &str) -> FirResult<String>;

    /// 文档标题
    fn document_title(&self) -> String;
}

/// 按请求构造视图渲染器
pub trait ViewFactory: Send + Sync {
    fn create(
        &self,
        settings: &Settings,
        translations: &Translations,
        request_path: &[String],
    ) -> Box<dyn ViewRenderer>;
}
