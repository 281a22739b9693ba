//! 请求上下文
//!
//! 每个请求在页面逻辑执行前构建一次上下文，构建顺序固定：
//!
//! 1. 通过设置提供者加载站点设置（每次请求重新读取）
//! 2. 设置中存在非空时区时，作为本次请求的时区
//! 3. 以站点语言为偏好解析生效语言
//! 4. 用设置、翻译表和请求路径构造视图渲染器
//!
//! 构建完成后上下文不可变。

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use std::fmt;
use std::sync::Arc;

use crate::database::{self, DbConnection};
use crate::error::FirResult;
use crate::language::{LanguageResolver, Translations};
use crate::models::{Model, ModelRegistry};
use crate::settings::{Settings, SettingsProvider};
use crate::timezone;
use crate::view::{ViewFactory, ViewRenderer};

/// 请求管线依赖的外部协作者，进程启动时组装一次
#[derive(Clone)]
pub struct Services {
    pub settings: Arc<dyn SettingsProvider>,
    pub languages: Arc<dyn LanguageResolver>,
    pub views: Arc<dyn ViewFactory>,
    pub models: Arc<ModelRegistry>,
}

/// 宿主解析出的请求输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInput {
    /// 路由段
    pub path: Vec<String>,
    /// 用户选择的语言（如 `lang` cookie）
    pub locale_choice: Option<String>,
}

impl RequestInput {
    pub fn new(path: Vec<String>) -> Self {
        Self {
            path,
            locale_choice: None,
        }
    }

    pub fn with_locale_choice(mut self, choice: Option<String>) -> Self {
        self.locale_choice = choice;
        self
    }
}

/// 单个请求的共享上下文
pub struct RequestContext {
    db: DbConnection,
    settings: Settings,
    timezone: Option<Tz>,
    locale: String,
    supported_locales: Vec<String>,
    translations: Translations,
    request_path: Vec<String>,
    view: Box<dyn ViewRenderer>,
    models: Arc<ModelRegistry>,
}

impl RequestContext {
    /// 构建请求上下文
    ///
    /// 缺失的可选设置不会导致失败；数据库句柄不可用或设置存储读取失败时返回错误。
    pub fn bootstrap(
        db: DbConnection,
        input: RequestInput,
        services: &Services,
    ) -> FirResult<Self> {
        // 后续所有模型都依赖这个句柄，先确认它可用
        drop(database::lock(&db)?);

        let settings = services.settings.load(&db)?;

        let timezone = timezone::from_settings(&settings);

        let resolution = services.languages.resolve_with_choice(
            input.locale_choice.as_deref(),
            settings.language().unwrap_or_default(),
        );

        let view = services
            .views
            .create(&settings, &resolution.translations, &input.path);

        Ok(Self {
            db,
            settings,
            timezone,
            locale: resolution.active,
            supported_locales: resolution.supported,
            translations: resolution.translations,
            request_path: input.path,
            view,
            models: Arc::clone(&services.models),
        })
    }

    /// 按名称实例化模型，每次调用返回新实例
    pub fn model(&self, name: &str) -> FirResult<Box<dyn Model>> {
        self.models.create(name, &self.db)
    }

    /// 按名称实例化模型并还原为具体类型
    pub fn model_as<M: Model>(&self, name: &str) -> FirResult<M> {
        self.models.create_as(name, &self.db)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// 本次请求的时区，未设置时为 `None`
    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    /// 请求时区下的当前时间
    pub fn now(&self) -> DateTime<FixedOffset> {
        timezone::now(self.timezone)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn supported_locales(&self) -> &[String] {
        &self.supported_locales
    }

    /// 翻译文本，缺失时返回键本身
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn request_path(&self) -> &[String] {
        &self.request_path
    }

    pub fn view(&self) -> &dyn ViewRenderer {
        self.view.as_ref()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("settings", &self.settings)
            .field("timezone", &self.timezone)
            .field("locale", &self.locale)
            .field("supported_locales", &self.supported_locales)
            .field("request_path", &self.request_path)
            .finish_non_exhaustive()
    }
}
