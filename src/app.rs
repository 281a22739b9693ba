//! 应用组装
//!
//! 打开数据库、填充默认站点设置、注册模型和页面，构建 HTTP 路由。

use anyhow::Context;
use axum::Router;
use fir_core::{
    database, DbConnection, LanguageCatalog, ModelRegistry, ModelSettingsProvider, Pipeline,
    Services, SettingsModel, TemplateViewFactory,
};
use fir_server::AppState;
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::pages;

/// 首次启动写入的站点设置
pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    ("title", "Fir"),
    ("language", "en"),
    ("timezone", ""),
    ("welcome", "Fir is up and running."),
];

/// 注册全部模型
pub fn models() -> ModelRegistry {
    ModelRegistry::with_defaults()
}

/// 组装请求管线的协作者
pub fn services(config: &AppConfig) -> anyhow::Result<Services> {
    let models = Arc::new(models());
    let languages = LanguageCatalog::load_dir(&config.languages.dir, &config.languages.default)
        .with_context(|| format!("加载语言包失败: {}", config.languages.dir.display()))?;
    info!(
        "[Fir] 已加载语言包: {:?}，默认语言 {}",
        languages.codes(),
        languages.fallback_code()
    );

    Ok(Services {
        settings: Arc::new(ModelSettingsProvider::new(Arc::clone(&models))),
        languages: Arc::new(languages),
        views: Arc::new(TemplateViewFactory::new(config.views.templates_dir.clone())),
        models,
    })
}

/// 打开数据库并写入缺失的默认设置
pub fn open_database(config: &AppConfig) -> anyhow::Result<DbConnection> {
    let db = database::open(&config.database.path)
        .with_context(|| format!("打开数据库失败: {}", config.database.path.display()))?;
    let seeded = SettingsModel::new(Arc::clone(&db)).seed_defaults(DEFAULT_SETTINGS)?;
    if seeded > 0 {
        info!("[Fir] 写入 {} 项默认站点设置", seeded);
    }
    Ok(db)
}

/// 构建 HTTP 路由
pub fn build(config: &AppConfig) -> anyhow::Result<Router> {
    let db = open_database(config)?;
    let pipeline = Pipeline::new(services(config)?);
    let state = AppState {
        db,
        pipeline: Arc::new(pipeline),
        pages: Arc::new(pages::registry()),
    };
    Ok(fir_server::router(state, &config.security))
}
