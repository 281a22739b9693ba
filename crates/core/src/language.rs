//! 语言解析
//!
//! # 不变量
//!
//! 解析结果的 `active` 总是 `supported` 中的一项；
//! 语言包为空时退回到解析器的默认代码。

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{FirError, FirResult};

/// 当前语言的翻译表
pub type Translations = BTreeMap<String, String>;

/// 语言解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageResolution {
    /// 生效的语言代码
    pub active: String,
    /// 全部可用语言（有序）
    pub supported: Vec<String>,
    /// 生效语言的翻译表
    pub translations: Translations,
}

/// 语言解析器
pub trait LanguageResolver: Send + Sync {
    /// 以 `preferred` 为偏好解析语言，无法识别时回退到默认语言
    fn resolve(&self, preferred: &str) -> LanguageResolution;

    fn supports(&self, code: &str) -> bool;

    /// 用户选择的语言可用时优先于站点偏好
    fn resolve_with_choice(&self, choice: Option<&str>, preferred: &str) -> LanguageResolution {
        match choice {
            Some(code) if self.supports(code) => self.resolve(code),
            _ => self.resolve(preferred),
        }
    }
}

/// 基于内存语言包的解析器
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    default: String,
    locales: BTreeMap<String, Translations>,
}

impl LanguageCatalog {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: normalize(&default.into()),
            locales: BTreeMap::new(),
        }
    }

    pub fn add_locale(&mut self, code: &str, translations: Translations) -> &mut Self {
        self.locales.insert(normalize(code), translations);
        self
    }

    /// 从目录加载 `<code>.json` 语言包
    ///
    /// 每个文件是一个扁平的 `{"key": "text"}` 对象，文件名即语言代码。
    /// 文件名不是合法语言代码的文件会被忽略。
    pub fn load_dir(dir: &Path, default: &str) -> FirResult<Self> {
        let mut catalog = Self::new(default);
        let entries = std::fs::read_dir(dir)
            .map_err(|e| FirError::Language(format!("{}: {e}", dir.display())))?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(code) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if !is_valid_code(code) {
                continue;
            }

            let raw = std::fs::read_to_string(&path)?;
            let translations: Translations = serde_json::from_str(&raw)
                .map_err(|e| FirError::Language(format!("{}: {e}", path.display())))?;
            catalog.add_locale(code, translations);
        }

        Ok(catalog)
    }

    /// 回退语言：配置的默认语言可用时使用它，否则取第一个可用语言
    pub fn fallback_code(&self) -> &str {
        if self.locales.contains_key(&self.default) {
            return &self.default;
        }
        self.locales
            .keys()
            .next()
            .map(String::as_str)
            .unwrap_or(self.default.as_str())
    }

    pub fn codes(&self) -> Vec<String> {
        self.locales.keys().cloned().collect()
    }
}

impl LanguageResolver for LanguageCatalog {
    fn resolve(&self, preferred: &str) -> LanguageResolution {
        let preferred = normalize(preferred);
        let active = if self.locales.contains_key(&preferred) {
            preferred
        } else {
            self.fallback_code().to_string()
        };

        LanguageResolution {
            translations: self.locales.get(&active).cloned().unwrap_or_default(),
            supported: self.codes(),
            active,
        }
    }

    fn supports(&self, code: &str) -> bool {
        self.locales.contains_key(&normalize(code))
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}

fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn catalog() -> LanguageCatalog {
        let mut catalog = LanguageCatalog::new("en");
        catalog.add_locale(
            "en",
            [("hello".to_string(), "Hello".to_string())].into(),
        );
        catalog.add_locale(
            "fr",
            [("hello".to_string(), "Bonjour".to_string())].into(),
        );
        catalog
    }

    #[test]
    fn test_resolve_preferred() {
        let resolution = catalog().resolve("fr");
        assert_eq!(resolution.active, "fr");
        assert_eq!(resolution.supported, vec!["en", "fr"]);
        assert_eq!(resolution.translations["hello"], "Bonjour");
    }

    #[test]
    fn test_resolve_normalizes_code() {
        assert_eq!(catalog().resolve(" FR ").active, "fr");
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let resolution = catalog().resolve("de");
        assert_eq!(resolution.active, "en");
        assert_eq!(resolution.translations["hello"], "Hello");

        assert_eq!(catalog().resolve("").active, "en");
    }

    #[test]
    fn test_fallback_without_default_locale() {
        let mut catalog = LanguageCatalog::new("en");
        catalog.add_locale("fr", Translations::new());
        catalog.add_locale("de", Translations::new());
        assert_eq!(catalog.resolve("it").active, "de");
    }

    #[test]
    fn test_empty_catalog_uses_default_code() {
        let resolution = LanguageCatalog::new("en").resolve("fr");
        assert_eq!(resolution.active, "en");
        assert!(resolution.supported.is_empty());
        assert!(resolution.translations.is_empty());
    }

    #[test]
    fn test_choice_takes_precedence() {
        let catalog = catalog();
        assert_eq!(catalog.resolve_with_choice(Some("fr"), "en").active, "fr");
        assert_eq!(catalog.resolve_with_choice(Some("xx"), "en").active, "en");
        assert_eq!(catalog.resolve_with_choice(None, "fr").active, "fr");
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), r#"{"hello": "Hello"}"#).unwrap();
        std::fs::write(dir.path().join("fr.json"), r#"{"hello": "Bonjour"}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(dir.path().join("bad name.json"), "{}").unwrap();

        let catalog = LanguageCatalog::load_dir(dir.path(), "en").unwrap();
        assert_eq!(catalog.codes(), vec!["en", "fr"]);
        assert_eq!(catalog.resolve("fr").translations["hello"], "Bonjour");
    }

    #[test]
    fn test_load_dir_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), "not json").unwrap();
        let result = LanguageCatalog::load_dir(dir.path(), "en");
        assert!(matches!(result, Err(FirError::Language(_))));
    }

    #[test]
    fn test_load_dir_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = LanguageCatalog::load_dir(&dir.path().join("missing"), "en");
        assert!(matches!(result, Err(FirError::Language(_))));
    }

    proptest! {
        #[test]
        fn prop_active_is_supported(preferred in "[a-zA-Z_-]{0,8}") {
            let resolution = catalog().resolve(&preferred);
            prop_assert!(resolution.supported.contains(&resolution.active));
        }
    }
}
