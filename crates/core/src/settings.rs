//! 站点设置
//!
//! 设置是请求开始时一次性加载的只读键值映射。
//! `language` 和 `timezone` 都是可选键，缺失时由下游回退。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::database::DbConnection;
use crate::error::FirResult;
use crate::models::{ModelRegistry, SettingsModel, SETTINGS_MODEL};

pub const LANGUAGE_KEY: &str = "language";
pub const TIMEZONE_KEY: &str = "timezone";
pub const TITLE_KEY: &str = "title";

/// 只读站点设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 站点首选语言，空字符串视为未设置
    pub fn language(&self) -> Option<&str> {
        self.non_empty(LANGUAGE_KEY)
    }

    /// 站点时区名称，空字符串视为未设置
    pub fn timezone(&self) -> Option<&str> {
        self.non_empty(TIMEZONE_KEY)
    }

    pub fn title(&self) -> Option<&str> {
        self.non_empty(TITLE_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 设置提供者
///
/// 每次构建请求上下文时调用一次，不做跨请求缓存。
/// 存储为空时返回空设置；存储不可用时返回错误。
pub trait SettingsProvider: Send + Sync {
    fn load(&self, db: &DbConnection) -> FirResult<Settings>;
}

/// 通过模型注册表实例化 `Settings` 模型读取设置
pub struct ModelSettingsProvider {
    models: Arc<ModelRegistry>,
}

impl ModelSettingsProvider {
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self { models }
    }
}

impl SettingsProvider for ModelSettingsProvider {
    fn load(&self, db: &DbConnection) -> FirResult<Settings> {
        let model: SettingsModel = self.models.create_as(SETTINGS_MODEL, db)?;
        model.get_all()
    }
}

/// 固定设置，不访问存储
pub struct StaticSettingsProvider(pub Settings);

impl SettingsProvider for StaticSettingsProvider {
    fn load(&self, _db: &DbConnection) -> FirResult<Settings> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;

    #[test]
    fn test_optional_keys() {
        let settings: Settings = [("language", "en"), ("timezone", "  ")].into_iter().collect();
        assert_eq!(settings.language(), Some("en"));
        assert_eq!(settings.timezone(), None);
        assert_eq!(settings.title(), None);

        let empty = Settings::new();
        assert!(empty.is_empty());
        assert_eq!(empty.language(), None);
    }

    #[test]
    fn test_serde_transparent() {
        let settings: Settings = [("title", "Fir")].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"title":"Fir"}"#
        );
    }

    #[test]
    fn test_model_provider_reads_table() {
        let db = database::open_in_memory().unwrap();
        {
            let conn = db.lock().unwrap();
            conn.execute(
                "INSERT INTO settings (key, value) VALUES ('language', 'fr')",
                [],
            )
            .unwrap();
        }

        let provider = ModelSettingsProvider::new(Arc::new(ModelRegistry::with_defaults()));
        let settings = provider.load(&db).unwrap();
        assert_eq!(settings.language(), Some("fr"));
        assert_eq!(settings.len(), 1);
    }

    #[test]
    fn test_model_provider_empty_store() {
        let db = database::open_in_memory().unwrap();
        let provider = ModelSettingsProvider::new(Arc::new(ModelRegistry::with_defaults()));
        assert!(provider.load(&db).unwrap().is_empty());
    }

    #[test]
    fn test_model_provider_requires_settings_model() {
        let db = database::open_in_memory().unwrap();
        let provider = ModelSettingsProvider::new(Arc::new(ModelRegistry::new()));
        let err = provider.load(&db).unwrap_err();
        assert!(err.is_configuration_defect());
    }
}
