//! Fir 请求管线核心
//!
//! 为每个请求构建共享上下文（数据库句柄、站点设置、语言、视图），
//! 执行页面逻辑后组装完整 HTML 文档或异步请求的 JSON 片段。
//!
//! ## 模块结构
//!
//! - `context` - 请求上下文构建和模型工厂
//! - `compose` - 页头/内容/页脚组装和内容协商
//! - `page` - 页面处理 trait 和请求管线
//! - `settings` - 站点设置和设置提供者
//! - `language` - 语言解析
//! - `view` - 视图渲染契约和文件模板实现
//! - `models` - 数据访问模型注册表
//! - `timezone` - 请求时区

pub mod compose;
pub mod context;
pub mod database;
pub mod error;
pub mod language;
pub mod models;
pub mod page;
pub mod settings;
pub mod timezone;
pub mod view;

// 重新导出
pub use compose::{
    AsyncFlag, AsyncSignal, FragmentPayload, ResponseComposer, ResponseEnvelope,
};
pub use context::{RequestContext, RequestInput, Services};
pub use database::DbConnection;
pub use error::{FirError, FirResult};
pub use language::{LanguageCatalog, LanguageResolution, LanguageResolver, Translations};
pub use models::{Model, ModelRegistry, SettingsModel};
pub use page::{Page, PageOutput, Pipeline};
pub use settings::{ModelSettingsProvider, Settings, SettingsProvider, StaticSettingsProvider};
pub use view::{TemplateView, TemplateViewFactory, ViewData, ViewFactory, ViewRenderer};
